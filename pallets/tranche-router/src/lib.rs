//! Tranche Router Pallet
//!
//! Stateless facade over the bond controller and the perpetual tranche.
//!
//! Previews compute the exact outcome of multi-step flows (tranche then deposit, tranche
//! then rollover, redeem perp) without leaving any trace in storage. The execute paths
//! recompute the same plan against current state and run it step by step through the
//! perpetual tranche, so a preview taken in the same block matches the execution.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod types;
pub use types::*;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::tranche-router";

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// Gives `who` enough collateral and fee tokens for any router flow.
  fn fund(who: &AccountId, collateral_amount: u128) -> frame::deps::sp_runtime::DispatchResult;
  /// Leaves `n` tokens of `amount` each up for rollover in the perpetual tranche reserve,
  /// with an acceptable deposit bond to tranche into.
  fn seed_rollover_reserve(who: &AccountId, n: u32, amount: u128) -> frame::deps::sp_runtime::DispatchResult;
}

#[frame::pallet]
pub mod pallet {
  use super::{
    LOG_TARGET, TrancheAndDepositPreview, TrancheAndRolloverPreview, WeightInfo, accumulate_fee,
  };
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::{
      storage::{TransactionOutcome, with_transaction},
      traits::{UnixTime, fungibles::Inspect as FungiblesInspect},
    },
    sp_runtime::DispatchError,
  };
  use frame::prelude::*;
  use primitives::{
    AssetId, Balance, BondController, BondId, BondInfo, BondIssuerInterface, FeeQuote, MintQuote,
    PerpetualTrancheInterface, RedemptionQuote, RolloverCandidate, RolloverOutcome, RolloverTrade,
    Valuation, plan_rollovers,
  };

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Balance lookups for tranche redemption
    type Assets: FungiblesInspect<Self::AccountId, AssetId = AssetId, Balance = Balance>;

    /// The perpetual tranche the router deposits into and rolls over against
    type Perp: PerpetualTrancheInterface<Self::AccountId>;

    /// Bond history, for redeeming tranches of any issued bond
    type BondIssuer: BondIssuerInterface;

    /// Collateral custody of issued bonds
    type BondController: BondController<Self::AccountId>;

    /// Wall-clock source for bond maturity
    type Time: UnixTime;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// Collateral was tranched and the tranches deposited for perp
    TranchedAndDeposited {
      who: T::AccountId,
      bond_id: BondId,
      collateral_amount: Balance,
      mint_amount: Balance,
      fee_asset: AssetId,
      fee: Balance,
      deposits: u32,
    },
    /// Collateral was tranched and the tranches rolled into the reserve
    TranchedAndRolledOver {
      who: T::AccountId,
      bond_id: BondId,
      collateral_amount: Balance,
      rollover_amount: Balance,
      fee_asset: AssetId,
      fee: Balance,
      trades: u32,
    },
    /// Tranches of a bond were redeemed for collateral
    TranchesRedeemed { who: T::AccountId, bond_id: BondId, collateral: Balance },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Amount must be positive
    ZeroAmount,
    /// Fees charged exceed the caller's limit
    FeeLimitExceeded,
    /// Bond issuer does not know the bond
    UnknownBond,
    /// Caller holds no redeemable tranche slice of the bond
    NothingToRedeem,
    /// Fees of one flow were charged in more than one asset
    MixedFeeAssets,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Tranche `collateral_amount` into the deposit bond and deposit every tranche that
    /// mints perp. Tranches that mint nothing stay with the caller.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::tranche_and_deposit())]
    pub fn tranche_and_deposit(
      origin: OriginFor<T>,
      collateral_amount: Balance,
      max_fee: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(collateral_amount > 0, Error::<T>::ZeroAmount);

      let (bond_id, bond) = T::Perp::deposit_bond()?;
      let tranches = T::BondController::tranche(&who, &bond, collateral_amount)?;

      let mut mint_amount: Balance = 0;
      let mut fee = Self::no_fee();
      let mut deposits = 0u32;
      for (asset, amount) in tranches {
        if Self::mints_nothing(asset, amount) {
          continue;
        }
        let quote = T::Perp::deposit(&who, asset, amount)?;
        mint_amount = mint_amount.saturating_add(quote.mint_amount);
        accumulate_fee(&mut fee, quote.fee).map_err(|_| Error::<T>::MixedFeeAssets)?;
        deposits += 1;
      }
      ensure!(fee.amount <= max_fee, Error::<T>::FeeLimitExceeded);

      log::debug!(
        target: LOG_TARGET,
        "tranched {} into bond {} and minted {} over {} deposits",
        collateral_amount,
        bond_id,
        mint_amount,
        deposits,
      );
      Self::deposit_event(Event::TranchedAndDeposited {
        who,
        bond_id,
        collateral_amount,
        mint_amount,
        fee_asset: fee.asset,
        fee: fee.amount,
        deposits,
      });
      Ok(())
    }

    /// Tranche `collateral_amount` into the deposit bond and roll the tranches into the
    /// reserve against every token up for rollover. Unmatched tranches stay with the caller.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::tranche_and_rollover(T::Perp::max_reserve_tokens()))]
    pub fn tranche_and_rollover(
      origin: OriginFor<T>,
      collateral_amount: Balance,
      max_fee: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(collateral_amount > 0, Error::<T>::ZeroAmount);

      let (bond_id, bond) = T::Perp::deposit_bond()?;
      let tranches = T::BondController::tranche(&who, &bond, collateral_amount)?;
      let trades = Self::plan_rollovers_for(&tranches);

      let mut rollover_amount: Balance = 0;
      let mut fee = Self::no_fee();
      for trade in &trades {
        let outcome = Self::execute_trade(&who, trade)?;
        rollover_amount = rollover_amount.saturating_add(outcome.quote.perp_rollover_amount);
        accumulate_fee(&mut fee, outcome.fee).map_err(|_| Error::<T>::MixedFeeAssets)?;
      }
      ensure!(fee.amount <= max_fee, Error::<T>::FeeLimitExceeded);

      log::debug!(
        target: LOG_TARGET,
        "tranched {} into bond {} and rolled over {} in {} trades",
        collateral_amount,
        bond_id,
        rollover_amount,
        trades.len(),
      );
      Self::deposit_event(Event::TranchedAndRolledOver {
        who,
        bond_id,
        collateral_amount,
        rollover_amount,
        fee_asset: fee.asset,
        fee: fee.amount,
        trades: trades.len() as u32,
      });
      Ok(())
    }

    /// Redeem the caller's tranches of `bond_id` for collateral.
    ///
    /// A mature bond redeems every tranche balance in full; an immature bond only redeems
    /// the largest complete slice of its ratio vector.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::redeem_tranches())]
    pub fn redeem_tranches(origin: OriginFor<T>, bond_id: BondId) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let bond = T::BondIssuer::bond(bond_id).ok_or(Error::<T>::UnknownBond)?;
      let balances: Vec<Balance> =
        bond.tranches.iter().map(|t| T::Assets::balance(t.asset, &who)).collect();

      let collateral = if bond.is_mature(T::Time::now().as_secs()) {
        let mut collateral: Balance = 0;
        for (tranche, balance) in bond.tranches.iter().zip(balances) {
          if balance > 0 {
            let out = T::BondController::redeem_mature(&who, &bond, tranche.asset, balance)?;
            collateral = collateral.saturating_add(out);
          }
        }
        collateral
      } else {
        let amounts = bond.proportional_redemption(&balances);
        ensure!(amounts.iter().any(|a| *a > 0), Error::<T>::NothingToRedeem);
        T::BondController::redeem_immature(&who, &bond, &amounts)?
      };
      ensure!(collateral > 0, Error::<T>::NothingToRedeem);

      Self::deposit_event(Event::TranchesRedeemed { who, bond_id, collateral });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Runs `f` against storage and discards every write it made.
    pub fn dry_run<R>(f: impl FnOnce() -> Result<R, DispatchError>) -> Result<R, DispatchError> {
      with_transaction(|| TransactionOutcome::Rollback(f()))
    }

    /// Zero fee in perp, the starting point of fee aggregation.
    fn no_fee() -> FeeQuote {
      FeeQuote { asset: T::Perp::perp_asset(), amount: 0 }
    }

    fn mints_nothing(asset: AssetId, amount: Balance) -> bool {
      Valuation::new(T::Perp::compute_yield(asset), 0).backing(amount) == 0
    }

    fn valuation(asset: AssetId) -> Valuation {
      Valuation::new(T::Perp::compute_yield(asset), T::Perp::compute_price(asset))
    }

    /// Two-pointer plan of `tranches` (tranche order) against the reserve tokens up for
    /// rollover that still carry value (ledger order).
    fn plan_rollovers_for(tranches: &[(AssetId, Balance)]) -> Vec<RolloverTrade> {
      let incoming: Vec<RolloverCandidate> = tranches
        .iter()
        .filter(|(_, amount)| *amount > 0)
        .map(|(asset, amount)| RolloverCandidate {
          asset: *asset,
          amount: *amount,
          valuation: Self::valuation(*asset),
        })
        .collect();
      let eligible = T::Perp::reserve_tokens_up_for_rollover();
      let outgoing: Vec<_> = T::Perp::reserve_snapshot()
        .into_iter()
        .filter(|entry| eligible.contains(&entry.asset) && !entry.valuation.is_zero())
        .collect();
      plan_rollovers(&incoming, &outgoing)
    }

    /// Replays a planned trade with the availability it was planned against.
    fn execute_trade(who: &T::AccountId, trade: &RolloverTrade) -> Result<RolloverOutcome, DispatchError> {
      let quote = trade.quote;
      T::Perp::rollover(
        who,
        trade.tranche_in,
        trade.token_out,
        quote.tranche_in_amount.saturating_add(quote.remaining_tranche_in_amount),
        quote.token_out_amount.saturating_add(quote.remaining_token_out_amount),
      )
    }

    pub fn preview_redeem(
      amount: Balance,
      max_tokens: Option<u32>,
    ) -> Result<RedemptionQuote, DispatchError> {
      T::Perp::preview_redeem(amount, max_tokens)
    }

    /// Deposit bond and the tranches `collateral_amount` would produce in it.
    pub fn preview_tranche(
      collateral_amount: Balance,
    ) -> Result<(BondId, BondInfo, Vec<(AssetId, Balance)>), DispatchError> {
      Self::dry_run(|| {
        let (bond_id, bond) = T::Perp::deposit_bond()?;
        let tranches = bond.tranche_amounts(collateral_amount);
        Ok((bond_id, bond, tranches))
      })
    }

    pub fn preview_deposit(tranche: AssetId, amount: Balance) -> Result<MintQuote, DispatchError> {
      T::Perp::preview_deposit(tranche, amount)
    }

    pub fn preview_tranche_and_deposit(
      collateral_amount: Balance,
    ) -> Result<TrancheAndDepositPreview, DispatchError> {
      ensure!(collateral_amount > 0, Error::<T>::ZeroAmount);
      Self::dry_run(|| {
        let (bond_id, bond) = T::Perp::deposit_bond()?;
        let tranches = bond.tranche_amounts(collateral_amount);

        let mut preview = TrancheAndDepositPreview { bond_id, fee: Self::no_fee(), ..Default::default() };
        for (asset, amount) in &tranches {
          let quote = if Self::mints_nothing(*asset, *amount) {
            MintQuote { tranche: *asset, tranche_amount: *amount, ..Default::default() }
          } else {
            T::Perp::preview_deposit(*asset, *amount)?
          };
          preview.perp_amount = preview.perp_amount.saturating_add(quote.perp_amount);
          preview.mint_amount = preview.mint_amount.saturating_add(quote.mint_amount);
          accumulate_fee(&mut preview.fee, quote.fee).map_err(|_| Error::<T>::MixedFeeAssets)?;
          preview.deposits.push(quote);
        }
        preview.tranches = tranches;

        log::debug!(
          target: LOG_TARGET,
          "preview tranche {} and deposit: {} perp, fee {}",
          collateral_amount,
          preview.mint_amount,
          preview.fee.amount,
        );
        Ok(preview)
      })
    }

    pub fn preview_rollover(
      tranche_in: AssetId,
      token_out: AssetId,
      tranche_in_amount: Balance,
      token_out_amount: Balance,
    ) -> Result<RolloverOutcome, DispatchError> {
      T::Perp::preview_rollover(tranche_in, token_out, tranche_in_amount, token_out_amount)
    }

    pub fn preview_tranche_and_rollover(
      collateral_amount: Balance,
    ) -> Result<TrancheAndRolloverPreview, DispatchError> {
      ensure!(collateral_amount > 0, Error::<T>::ZeroAmount);
      Self::dry_run(|| {
        let (bond_id, bond) = T::Perp::deposit_bond()?;
        let tranches = bond.tranche_amounts(collateral_amount);
        let trades = Self::plan_rollovers_for(&tranches);

        let mut preview = TrancheAndRolloverPreview { bond_id, fee: Self::no_fee(), ..Default::default() };
        let mut remaining = tranches.clone();
        for trade in &trades {
          let notional = trade.quote.perp_rollover_amount;
          preview.rollover_amount = preview.rollover_amount.saturating_add(notional);
          accumulate_fee(&mut preview.fee, T::Perp::compute_rollover_fee(notional))
            .map_err(|_| Error::<T>::MixedFeeAssets)?;
          if let Some((_, left)) = remaining.iter_mut().find(|(asset, _)| *asset == trade.tranche_in) {
            *left = left.saturating_sub(trade.quote.tranche_in_amount);
          }
        }
        preview.tranches = tranches;
        preview.trades = trades;
        preview.remaining = remaining;

        log::debug!(
          target: LOG_TARGET,
          "preview tranche {} and rollover: {} in {} trades, fee {}",
          collateral_amount,
          preview.rollover_amount,
          preview.trades.len(),
          preview.fee.amount,
        );
        Ok(preview)
      })
    }
  }
}
