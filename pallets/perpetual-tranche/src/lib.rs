//! Perpetual Tranche Pallet
//!
//! Mints a perpetual claim token ("perp") against a reserve of fixed-maturity bond
//! tranches and keeps that reserve fresh through rollovers.
//!
//! ## Overview
//!
//! - **Deposit**: a tranche of the current deposit bond is exchanged for perp at the
//!   tranche's yield.
//! - **Burn**: perp is exchanged for a basket of reserve tokens taken in ledger order.
//! - **Rollover**: a tranche of the deposit bond replaces a reserve token that has matured,
//!   has no defined yield, or left the tolerated maturity window.
//!
//! The reserve ledger is an ordered set of asset ids plus a balance per asset, always equal
//! to what the reserve account actually holds. Amounts are computed by the pure functions
//! in [`primitives::reserve`], which the router also uses for its previews.
//!
//! Fees, prices and yields come from the `FeeStrategy`, `PricingStrategy` and
//! `YieldStrategy` config types. [`DefinedYieldTable`] is a yield strategy backed by the
//! admin-managed `DefinedYields` storage of this pallet.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod ledger;
pub mod types;
pub use types::DefinedYieldTable;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::perpetual-tranche";

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// Issues a deposit bond with defined yields and funds `who` with `amount` of each
  /// tranche and of the fee asset. Returns the senior tranche.
  fn setup_deposit(who: &AccountId, amount: u128) -> Result<u32, frame::deps::sp_runtime::DispatchError>;
  /// Deposits `amount` of tranches from successive deposit bonds until the ledger lists
  /// `n` tokens, all backed.
  fn seed_reserve(who: &AccountId, n: u32, amount: u128) -> frame::deps::sp_runtime::DispatchResult;
  /// Moves time past the maturity of every bond issued so far.
  fn mature_reserve();
}

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, WeightInfo};
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::{
      storage::{TransactionOutcome, with_transaction},
      traits::{
        UnixTime,
        fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
        tokens::{Fortitude, Precision, Preservation},
      },
    },
    sp_runtime::{DispatchError, traits::AccountIdConversion},
  };
  use frame::prelude::*;
  use primitives::{
    AssetId, Balance, BondId, BondInfo, BondIssuerInterface, FeeQuote, FeeStrategy, MintQuote,
    Moment, PerpetualTrancheInterface, PricingStrategy, RedemptionQuote, ReserveEntry,
    RolloverOutcome, TrancheClass, Valuation, YieldStrategy, plan_redemption, quote_rollover,
    reserve_value,
  };

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Custody of perp, tranche, collateral and fee tokens
    type Assets: FungiblesInspect<Self::AccountId, AssetId = AssetId, Balance = Balance>
      + FungiblesMutate<Self::AccountId, AssetId = AssetId, Balance = Balance>;

    /// Source of deposit bonds
    type BondIssuer: BondIssuerInterface;

    /// Mint, burn and rollover fees
    type FeeStrategy: FeeStrategy;

    /// Unit value of reserve tokens
    type PricingStrategy: PricingStrategy;

    /// Backing weight of tranche classes
    type YieldStrategy: YieldStrategy;

    /// Wall-clock source for maturity checks
    type Time: UnixTime;

    /// Origin allowed to change the maturity window and the yield table
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// The pallet ID deriving the reserve account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Asset id of the perp token
    #[pallet::constant]
    type PerpAsset: Get<AssetId>;

    /// Maximum number of distinct tokens the reserve may hold
    #[pallet::constant]
    type MaxReserveTokens: Get<u32>;

    /// Default lower bound of the tolerated residual maturity
    #[pallet::constant]
    type DefaultMinTrancheMaturity: Get<Moment>;

    /// Default upper bound of the tolerated residual maturity
    #[pallet::constant]
    type DefaultMaxTrancheMaturity: Get<Moment>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  /// Reserve tokens in insertion order
  #[pallet::storage]
  #[pallet::getter(fn reserve_tokens)]
  pub type ReserveTokens<T: Config> =
    StorageValue<_, BoundedVec<AssetId, T::MaxReserveTokens>, ValueQuery>;

  /// Tracked reserve balance per token
  #[pallet::storage]
  pub type ReserveBalances<T> = StorageMap<_, Blake2_128Concat, AssetId, Balance, ValueQuery>;

  /// Bond currently accepted for deposits and incoming rollovers
  #[pallet::storage]
  pub type DepositBond<T> = StorageValue<_, BondId, OptionQuery>;

  #[pallet::storage]
  pub type MinTrancheMaturity<T: Config> =
    StorageValue<_, Moment, ValueQuery, T::DefaultMinTrancheMaturity>;

  #[pallet::storage]
  pub type MaxTrancheMaturity<T: Config> =
    StorageValue<_, Moment, ValueQuery, T::DefaultMaxTrancheMaturity>;

  /// Yield per tranche class, read by [`crate::DefinedYieldTable`]
  #[pallet::storage]
  pub type DefinedYields<T> = StorageMap<_, Blake2_128Concat, TrancheClass, Balance, OptionQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// Tranches were exchanged for perp
    Deposited {
      who: T::AccountId,
      tranche: AssetId,
      tranche_amount: Balance,
      mint_amount: Balance,
      fee_asset: AssetId,
      fee: Balance,
    },
    /// Perp was exchanged for reserve tokens
    Redeemed {
      who: T::AccountId,
      burn_amount: Balance,
      redeemed_value: Balance,
      fee_asset: AssetId,
      fee: Balance,
      tokens: u32,
    },
    /// A reserve token was replaced by a deposit bond tranche
    RolledOver {
      who: T::AccountId,
      tranche_in: AssetId,
      token_out: AssetId,
      tranche_in_amount: Balance,
      token_out_amount: Balance,
      rollover_amount: Balance,
      fee_asset: AssetId,
      fee: Balance,
    },
    /// Tracked balance of a reserve token changed
    ReserveSynced { asset: AssetId, balance: Balance },
    /// A new deposit bond was adopted
    DepositBondUpdated { bond_id: BondId, maturity: Moment },
    /// Tolerated maturity window changed
    TolerableTrancheMaturityUpdated {
      old_min: Moment,
      old_max: Moment,
      new_min: Moment,
      new_max: Moment,
    },
    /// Yield of a tranche class changed
    DefinedYieldUpdated {
      class: TrancheClass,
      old_yield: Option<Balance>,
      new_yield: Option<Balance>,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Tranche does not belong to an acceptable deposit bond
    UnacceptableDeposit,
    /// Incoming tranche is not acceptable or outgoing token is not up for rollover
    UnacceptableRollover,
    /// Amount must be positive
    ZeroAmount,
    /// Deposit backs no perp
    ZeroMint,
    /// Reserve cannot cover the requested redemption
    InsufficientReserve,
    /// Fee charged in perp consumes the whole amount
    FeeExceedsAmount,
    /// Reserve already holds the maximum number of tokens
    ReserveLimitReached,
    /// Minimum maturity exceeds maximum maturity
    InvalidTrancheMaturityBounds,
    /// No acceptable deposit bond is available
    NoDepositBond,
    /// Bond issuer does not know the bond
    UnknownBond,
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    #[cfg(feature = "try-runtime")]
    fn try_state(_n: BlockNumberFor<T>) -> Result<(), frame::deps::sp_runtime::TryRuntimeError> {
      Self::do_try_state()
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Deposit `amount` of a deposit bond tranche and receive perp.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::deposit())]
    pub fn deposit(origin: OriginFor<T>, tranche: AssetId, amount: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_deposit(&who, tranche, amount)?;
      Ok(())
    }

    /// Burn perp for reserve tokens.
    ///
    /// `max_tokens` bounds how many reserve tokens are released; value left uncovered by
    /// the cap stays with the caller.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::burn(max_tokens.unwrap_or_else(T::MaxReserveTokens::get)))]
    pub fn burn(origin: OriginFor<T>, amount: Balance, max_tokens: Option<u32>) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_burn(&who, amount, max_tokens)?;
      Ok(())
    }

    /// Swap a deposit bond tranche for a reserve token that is up for rollover.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::rollover())]
    pub fn rollover(
      origin: OriginFor<T>,
      tranche_in: AssetId,
      token_out: AssetId,
      tranche_in_amount: Balance,
      token_out_amount: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_rollover(&who, tranche_in, token_out, tranche_in_amount, token_out_amount)?;
      Ok(())
    }

    /// Adopt the latest bond as deposit bond if it is due.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::poke_deposit_bond())]
    pub fn poke_deposit_bond(origin: OriginFor<T>) -> DispatchResult {
      ensure_signed(origin)?;
      Self::update_deposit_bond()?;
      Ok(())
    }

    /// Update the tolerated residual maturity window (admin only).
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::update_tolerable_tranche_maturity())]
    pub fn update_tolerable_tranche_maturity(
      origin: OriginFor<T>,
      min: Moment,
      max: Moment,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(min <= max, Error::<T>::InvalidTrancheMaturityBounds);

      let old_min = MinTrancheMaturity::<T>::get();
      let old_max = MaxTrancheMaturity::<T>::get();
      MinTrancheMaturity::<T>::put(min);
      MaxTrancheMaturity::<T>::put(max);
      Self::deposit_event(Event::TolerableTrancheMaturityUpdated {
        old_min,
        old_max,
        new_min: min,
        new_max: max,
      });
      Ok(())
    }

    /// Define (or with `None`, clear) the yield of a tranche class (admin only).
    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::update_defined_yield())]
    pub fn update_defined_yield(
      origin: OriginFor<T>,
      class: TrancheClass,
      yield_factor: Option<Balance>,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;

      let old_yield = DefinedYields::<T>::get(&class);
      match yield_factor {
        Some(value) => DefinedYields::<T>::insert(&class, value),
        None => DefinedYields::<T>::remove(&class),
      }
      Self::deposit_event(Event::DefinedYieldUpdated { class, old_yield, new_yield: yield_factor });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Reserve account
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    pub fn perp_asset() -> AssetId {
      T::PerpAsset::get()
    }

    pub fn now() -> Moment {
      T::Time::now().as_secs()
    }

    /// Runs `f` against storage and discards every write it made.
    pub fn dry_run<R>(f: impl FnOnce() -> Result<R, DispatchError>) -> Result<R, DispatchError> {
      with_transaction(|| TransactionOutcome::Rollback(f()))
    }

    /// Moves the deposit bond pointer to the latest issued bond when that bond is new and
    /// within the maturity window, issuing it first if its window just opened.
    pub fn update_deposit_bond() -> Result<(BondId, BondInfo), DispatchError> {
      let latest = T::BondIssuer::issue()?;
      let current = DepositBond::<T>::get();
      if current != Some(latest) {
        let bond = T::BondIssuer::bond(latest).ok_or(Error::<T>::UnknownBond)?;
        if Self::is_acceptable_bond(&bond, Self::now()) {
          DepositBond::<T>::put(latest);
          log::info!(
            target: LOG_TARGET,
            "deposit bond {:?} -> {} maturing at {}",
            current,
            latest,
            bond.maturity,
          );
          Self::deposit_event(Event::DepositBondUpdated { bond_id: latest, maturity: bond.maturity });
          return Ok((latest, bond));
        }
      }
      let bond_id = current.ok_or(Error::<T>::NoDepositBond)?;
      let bond = T::BondIssuer::bond(bond_id).ok_or(Error::<T>::UnknownBond)?;
      Ok((bond_id, bond))
    }

    /// Residual maturity of `bond` lies inside the tolerated window.
    pub fn is_acceptable_bond(bond: &BondInfo, now: Moment) -> bool {
      let remaining = bond.time_to_maturity(now);
      !bond.is_mature(now)
        && remaining >= MinTrancheMaturity::<T>::get()
        && remaining <= MaxTrancheMaturity::<T>::get()
    }

    pub fn is_acceptable_tranche(bond: &BondInfo, tranche: AssetId) -> bool {
      bond.contains(tranche) && Self::is_acceptable_bond(bond, Self::now())
    }

    /// Bond and tranche index of an issued tranche asset.
    pub fn tranche_bond(asset: AssetId) -> Option<(BondInfo, u8)> {
      let (bond_id, index) = T::BondIssuer::locate_tranche(asset)?;
      T::BondIssuer::bond(bond_id).map(|bond| (bond, index))
    }

    pub fn tranche_class(asset: AssetId) -> Option<TrancheClass> {
      let (bond, index) = Self::tranche_bond(asset)?;
      bond.tranche_class(index)
    }

    /// Yield of `asset`; zero for the perp itself, non-tranches and undefined classes.
    pub fn compute_yield(asset: AssetId) -> Balance {
      if asset == Self::perp_asset() {
        return 0;
      }
      Self::tranche_class(asset)
        .map(|class| T::YieldStrategy::compute_yield(&class))
        .unwrap_or(0)
    }

    pub fn compute_price(asset: AssetId) -> Balance {
      T::PricingStrategy::compute_price(asset)
    }

    pub fn valuation(asset: AssetId) -> Valuation {
      Valuation::new(Self::compute_yield(asset), Self::compute_price(asset))
    }

    /// Reserve token that matured, has no yield, or left the maturity window.
    pub fn is_up_for_rollover(asset: AssetId, now: Moment) -> bool {
      Self::in_reserve(asset) && Self::is_stale(asset, now)
    }

    /// Rollover eligibility of a token already known to be in the ledger.
    fn is_stale(asset: AssetId, now: Moment) -> bool {
      if asset == Self::perp_asset() {
        return false;
      }
      let Some((bond, _)) = Self::tranche_bond(asset) else {
        return true;
      };
      Self::compute_yield(asset) == 0 || !Self::is_acceptable_bond(&bond, now)
    }

    /// Reserve tokens up for rollover, in ledger order.
    pub fn reserve_tokens_up_for_rollover() -> Vec<AssetId> {
      let now = Self::now();
      ReserveTokens::<T>::get()
        .into_iter()
        .filter(|asset| Self::is_stale(*asset, now))
        .collect()
    }

    pub fn reserve_snapshot() -> Vec<ReserveEntry> {
      ReserveTokens::<T>::get()
        .into_iter()
        .map(|asset| ReserveEntry {
          asset,
          balance: ReserveBalances::<T>::get(asset),
          valuation: Self::valuation(asset),
        })
        .collect()
    }

    /// Price-weighted value of the whole reserve in perp units.
    pub fn reserve_value() -> Balance {
      reserve_value(&Self::reserve_snapshot())
    }

    fn zero_fee(fee: FeeQuote) -> FeeQuote {
      FeeQuote { asset: fee.asset, amount: 0 }
    }

    pub fn quote_deposit(
      bond: &BondInfo,
      tranche: AssetId,
      amount: Balance,
    ) -> Result<MintQuote, DispatchError> {
      ensure!(amount > 0, Error::<T>::ZeroAmount);
      ensure!(Self::is_acceptable_tranche(bond, tranche), Error::<T>::UnacceptableDeposit);

      let perp_amount = Self::valuation(tranche).backing(amount);
      ensure!(perp_amount > 0, Error::<T>::ZeroMint);

      let fee = T::FeeStrategy::compute_mint_fee(perp_amount);
      let mint_amount = if fee.is_in(Self::perp_asset()) {
        ensure!(fee.amount < perp_amount, Error::<T>::FeeExceedsAmount);
        perp_amount - fee.amount
      } else {
        perp_amount
      };
      Ok(MintQuote { tranche, tranche_amount: amount, perp_amount, mint_amount, fee })
    }

    /// Redemption of `amount` perp against the current ledger.
    ///
    /// A perp fee is netted out of `amount` before the walk and charged on top of the
    /// covered value, so `burn_amount <= amount`.
    pub fn quote_burn(
      amount: Balance,
      max_tokens: Option<u32>,
    ) -> Result<RedemptionQuote, DispatchError> {
      ensure!(amount > 0, Error::<T>::ZeroAmount);

      let fee = T::FeeStrategy::compute_burn_fee(amount);
      let fee_in_perp = fee.is_in(Self::perp_asset());
      let target = if fee_in_perp {
        ensure!(fee.amount < amount, Error::<T>::FeeExceedsAmount);
        amount - fee.amount
      } else {
        amount
      };

      let plan = plan_redemption(&Self::reserve_snapshot(), target, max_tokens)
        .map_err(|_| Error::<T>::InsufficientReserve)?;
      if plan.covered == 0 {
        return Ok(RedemptionQuote { fee: Self::zero_fee(fee), tokens: plan.tokens, ..Default::default() });
      }

      let burn_amount = if fee_in_perp { plan.covered.saturating_add(fee.amount) } else { plan.covered };
      Ok(RedemptionQuote { burn_amount, redeemed_value: plan.covered, fee, tokens: plan.tokens })
    }

    pub fn quote_rollover(
      bond: &BondInfo,
      tranche_in: AssetId,
      token_out: AssetId,
      tranche_in_amount: Balance,
      token_out_amount: Balance,
    ) -> Result<RolloverOutcome, DispatchError> {
      ensure!(Self::is_acceptable_tranche(bond, tranche_in), Error::<T>::UnacceptableRollover);
      ensure!(Self::is_up_for_rollover(token_out, Self::now()), Error::<T>::UnacceptableRollover);

      let quote = quote_rollover(
        Self::valuation(tranche_in),
        Self::valuation(token_out),
        tranche_in_amount,
        token_out_amount,
        ReserveBalances::<T>::get(token_out),
      );
      let fee = T::FeeStrategy::compute_rollover_fee(quote.perp_rollover_amount);
      let fee = if quote.is_zero() { Self::zero_fee(fee) } else { fee };
      Ok(RolloverOutcome { quote, fee })
    }

    pub fn preview_deposit(tranche: AssetId, amount: Balance) -> Result<MintQuote, DispatchError> {
      Self::dry_run(|| {
        let (_, bond) = Self::update_deposit_bond()?;
        Self::quote_deposit(&bond, tranche, amount)
      })
    }

    pub fn preview_rollover(
      tranche_in: AssetId,
      token_out: AssetId,
      tranche_in_amount: Balance,
      token_out_amount: Balance,
    ) -> Result<RolloverOutcome, DispatchError> {
      Self::dry_run(|| {
        let (_, bond) = Self::update_deposit_bond()?;
        Self::quote_rollover(&bond, tranche_in, token_out, tranche_in_amount, token_out_amount)
      })
    }

    pub fn do_deposit(
      who: &T::AccountId,
      tranche: AssetId,
      amount: Balance,
    ) -> Result<MintQuote, DispatchError> {
      let (_, bond) = Self::update_deposit_bond()?;
      let quote = Self::quote_deposit(&bond, tranche, amount)?;
      let perp = Self::perp_asset();

      Self::transfer_in(who, tranche, amount)?;
      if quote.fee.is_in(perp) {
        if quote.fee.amount > 0 {
          T::Assets::mint_into(perp, &Self::account_id(), quote.fee.amount)?;
          Self::sync_reserve(perp)?;
        }
      } else {
        Self::collect_fee(who, quote.fee)?;
      }
      T::Assets::mint_into(perp, who, quote.mint_amount)?;

      log::debug!(
        target: LOG_TARGET,
        "deposit {} of {} -> {} perp (fee {} of {})",
        amount,
        tranche,
        quote.mint_amount,
        quote.fee.amount,
        quote.fee.asset,
      );
      Self::deposit_event(Event::Deposited {
        who: who.clone(),
        tranche,
        tranche_amount: amount,
        mint_amount: quote.mint_amount,
        fee_asset: quote.fee.asset,
        fee: quote.fee.amount,
      });
      Ok(quote)
    }

    pub fn do_burn(
      who: &T::AccountId,
      amount: Balance,
      max_tokens: Option<u32>,
    ) -> Result<RedemptionQuote, DispatchError> {
      let quote = Self::quote_burn(amount, max_tokens)?;
      if quote.redeemed_value == 0 {
        return Ok(quote);
      }

      T::Assets::burn_from(
        Self::perp_asset(),
        who,
        quote.redeemed_value,
        Preservation::Expendable,
        Precision::Exact,
        Fortitude::Polite,
      )?;
      let mut touched = Vec::with_capacity(quote.tokens.len() + 1);
      for (asset, amount) in quote.tokens.iter().flatten() {
        Self::release(who, *asset, *amount)?;
        touched.push(*asset);
      }
      let released = touched.len() as u32;
      touched.extend(Self::take_fee(who, quote.fee)?);
      Self::sync_touched(&touched)?;

      log::debug!(
        target: LOG_TARGET,
        "burn {} perp -> {} value over {} tokens",
        quote.burn_amount,
        quote.redeemed_value,
        released,
      );
      Self::deposit_event(Event::Redeemed {
        who: who.clone(),
        burn_amount: quote.burn_amount,
        redeemed_value: quote.redeemed_value,
        fee_asset: quote.fee.asset,
        fee: quote.fee.amount,
        tokens: released,
      });
      Ok(quote)
    }

    pub fn do_rollover(
      who: &T::AccountId,
      tranche_in: AssetId,
      token_out: AssetId,
      tranche_in_amount: Balance,
      token_out_amount: Balance,
    ) -> Result<RolloverOutcome, DispatchError> {
      let (_, bond) = Self::update_deposit_bond()?;
      let outcome =
        Self::quote_rollover(&bond, tranche_in, token_out, tranche_in_amount, token_out_amount)?;
      let quote = outcome.quote;
      if quote.is_zero() {
        log::debug!(target: LOG_TARGET, "rollover {} -> {} has no notional", tranche_in, token_out);
        return Ok(outcome);
      }

      Self::release(who, token_out, quote.token_out_amount)?;
      Self::receive(who, tranche_in, quote.tranche_in_amount)?;
      let mut touched = alloc::vec![token_out, tranche_in];
      touched.extend(Self::take_fee(who, outcome.fee)?);
      Self::sync_touched(&touched)?;

      Self::deposit_event(Event::RolledOver {
        who: who.clone(),
        tranche_in,
        token_out,
        tranche_in_amount: quote.tranche_in_amount,
        token_out_amount: quote.token_out_amount,
        rollover_amount: quote.perp_rollover_amount,
        fee_asset: outcome.fee.asset,
        fee: outcome.fee.amount,
      });
      Ok(outcome)
    }
  }

  impl<T: Config> PerpetualTrancheInterface<T::AccountId> for Pallet<T> {
    fn perp_asset() -> AssetId {
      Self::perp_asset()
    }

    fn deposit_bond() -> Result<(BondId, BondInfo), DispatchError> {
      Self::update_deposit_bond()
    }

    fn reserve_snapshot() -> Vec<ReserveEntry> {
      Self::reserve_snapshot()
    }

    fn reserve_tokens_up_for_rollover() -> Vec<AssetId> {
      Self::reserve_tokens_up_for_rollover()
    }

    fn max_reserve_tokens() -> u32 {
      T::MaxReserveTokens::get()
    }

    fn compute_yield(asset: AssetId) -> Balance {
      Self::compute_yield(asset)
    }

    fn compute_price(asset: AssetId) -> Balance {
      Self::compute_price(asset)
    }

    fn preview_deposit(tranche: AssetId, amount: Balance) -> Result<MintQuote, DispatchError> {
      Self::preview_deposit(tranche, amount)
    }

    fn preview_redeem(
      amount: Balance,
      max_tokens: Option<u32>,
    ) -> Result<RedemptionQuote, DispatchError> {
      Self::quote_burn(amount, max_tokens)
    }

    fn preview_rollover(
      tranche_in: AssetId,
      token_out: AssetId,
      tranche_in_amount: Balance,
      token_out_amount: Balance,
    ) -> Result<RolloverOutcome, DispatchError> {
      Self::preview_rollover(tranche_in, token_out, tranche_in_amount, token_out_amount)
    }

    fn compute_rollover_fee(notional: Balance) -> FeeQuote {
      T::FeeStrategy::compute_rollover_fee(notional)
    }

    fn deposit(who: &T::AccountId, tranche: AssetId, amount: Balance) -> Result<MintQuote, DispatchError> {
      Self::do_deposit(who, tranche, amount)
    }

    fn burn(
      who: &T::AccountId,
      amount: Balance,
      max_tokens: Option<u32>,
    ) -> Result<RedemptionQuote, DispatchError> {
      Self::do_burn(who, amount, max_tokens)
    }

    fn rollover(
      who: &T::AccountId,
      tranche_in: AssetId,
      token_out: AssetId,
      tranche_in_amount: Balance,
      token_out_amount: Balance,
    ) -> Result<RolloverOutcome, DispatchError> {
      Self::do_rollover(who, tranche_in, token_out, tranche_in_amount, token_out_amount)
    }
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// Initial maturity window, defaults to the config constants
    pub tolerable_tranche_maturity: Option<(Moment, Moment)>,
    /// Initial yield table: (collateral, tranche ratios, tranche index, yield)
    pub defined_yields: Vec<(AssetId, Vec<u32>, u8, Balance)>,
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      frame_system::Pallet::<T>::inc_providers(&Pallet::<T>::account_id());

      if let Some((min, max)) = self.tolerable_tranche_maturity {
        assert!(min <= max, "invalid genesis maturity window");
        MinTrancheMaturity::<T>::put(min);
        MaxTrancheMaturity::<T>::put(max);
      }
      for (collateral, ratios, index, yield_factor) in &self.defined_yields {
        let class = TrancheClass {
          collateral: *collateral,
          ratios: ratios.clone().try_into().expect("genesis tranche ratios exceed bond capacity"),
          index: *index,
        };
        DefinedYields::<T>::insert(class, yield_factor);
      }
    }
  }
}
