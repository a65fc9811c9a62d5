//! Interfaces between the pallets and towards the bond mechanics they rely on.

use crate::{
  assets::AssetId,
  bond::{BondId, BondInfo, Moment},
  ecosystem::Balance,
  reserve::{MintQuote, RedemptionQuote, ReserveEntry, RolloverOutcome},
  strategies::FeeQuote,
};
use alloc::vec::Vec;
use polkadot_sdk::sp_runtime::DispatchError;

/// Materializes the tranche tokens of a freshly scheduled bond.
pub trait BondFactory {
  /// Creates one tranche asset per ratio and returns their ids in tranche order.
  fn create_bond(
    bond_id: BondId,
    collateral: AssetId,
    ratios: &[u32],
    maturity: Moment,
  ) -> Result<Vec<AssetId>, DispatchError>;
}

/// Collateral custody of issued bonds.
pub trait BondController<AccountId> {
  /// Locks `collateral_amount` from `who` in `bond` and mints the tranches to `who`.
  fn tranche(
    who: &AccountId,
    bond: &BondInfo,
    collateral_amount: Balance,
  ) -> Result<Vec<(AssetId, Balance)>, DispatchError>;

  /// Redeems `amount` of one tranche of a mature bond for collateral.
  fn redeem_mature(
    who: &AccountId,
    bond: &BondInfo,
    tranche: AssetId,
    amount: Balance,
  ) -> Result<Balance, DispatchError>;

  /// Redeems a ratio-proportional slice (one amount per tranche) of an immature bond.
  fn redeem_immature(
    who: &AccountId,
    bond: &BondInfo,
    amounts: &[Balance],
  ) -> Result<Balance, DispatchError>;
}

pub trait BondIssuerInterface {
  /// Issues a bond for the current slot if none exists yet and returns the latest bond.
  fn issue() -> Result<BondId, DispatchError>;
  fn latest_bond() -> Result<BondId, DispatchError>;
  fn bond(bond_id: BondId) -> Option<BondInfo>;
  /// Bond and tranche index of an issued tranche asset.
  fn locate_tranche(asset: AssetId) -> Option<(BondId, u8)>;
}

/// Public surface of the perpetual tranche consumed by the router.
pub trait PerpetualTrancheInterface<AccountId> {
  fn perp_asset() -> AssetId;
  /// Advances the deposit bond if due and returns it.
  fn deposit_bond() -> Result<(BondId, BondInfo), DispatchError>;
  fn reserve_snapshot() -> Vec<ReserveEntry>;
  fn reserve_tokens_up_for_rollover() -> Vec<AssetId>;
  /// Capacity of the reserve ledger.
  fn max_reserve_tokens() -> u32;
  fn compute_yield(asset: AssetId) -> Balance;
  fn compute_price(asset: AssetId) -> Balance;

  fn preview_deposit(tranche: AssetId, amount: Balance) -> Result<MintQuote, DispatchError>;
  fn preview_redeem(
    amount: Balance,
    max_tokens: Option<u32>,
  ) -> Result<RedemptionQuote, DispatchError>;
  fn preview_rollover(
    tranche_in: AssetId,
    token_out: AssetId,
    tranche_in_amount: Balance,
    token_out_amount: Balance,
  ) -> Result<RolloverOutcome, DispatchError>;
  fn compute_rollover_fee(notional: Balance) -> FeeQuote;

  fn deposit(who: &AccountId, tranche: AssetId, amount: Balance) -> Result<MintQuote, DispatchError>;
  fn burn(
    who: &AccountId,
    amount: Balance,
    max_tokens: Option<u32>,
  ) -> Result<RedemptionQuote, DispatchError>;
  fn rollover(
    who: &AccountId,
    tranche_in: AssetId,
    token_out: AssetId,
    tranche_in_amount: Balance,
    token_out_amount: Balance,
  ) -> Result<RolloverOutcome, DispatchError>;
}
