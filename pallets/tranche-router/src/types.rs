use codec::{Decode, Encode};
use primitives::{AssetId, Balance, BondId, FeeQuote, MintQuote, RolloverTrade};
use scale_info::{TypeInfo, prelude::vec::Vec};

/// Outcome of tranching collateral into the deposit bond and depositing every tranche.
#[derive(Clone, Debug, Default, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct TrancheAndDepositPreview {
  pub bond_id: BondId,
  /// Tranches produced by the collateral, in tranche order
  pub tranches: Vec<(AssetId, Balance)>,
  /// One quote per tranche; tranches that mint nothing have an all-zero quote
  pub deposits: Vec<MintQuote>,
  /// Perp backed before fees
  pub perp_amount: Balance,
  /// Perp received after perp-denominated fees
  pub mint_amount: Balance,
  pub fee: FeeQuote,
}

/// Outcome of tranching collateral into the deposit bond and rolling the tranches into
/// the reserve.
#[derive(Clone, Debug, Default, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct TrancheAndRolloverPreview {
  pub bond_id: BondId,
  pub tranches: Vec<(AssetId, Balance)>,
  /// Trades in execution order
  pub trades: Vec<RolloverTrade>,
  /// Perp value rolled over across all trades
  pub rollover_amount: Balance,
  pub fee: FeeQuote,
  /// Tranche amounts left with the caller
  pub remaining: Vec<(AssetId, Balance)>,
}

/// A fee charged in an asset other than the one already being summed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MixedFeeAssets;

/// Adds `fee` to the running `total`, adopting its asset on the first nonzero charge.
///
/// Totals are kept in a single asset; a nonzero charge in another asset is rejected.
pub(crate) fn accumulate_fee(total: &mut FeeQuote, fee: FeeQuote) -> Result<(), MixedFeeAssets> {
  if fee.amount == 0 {
    return Ok(());
  }
  if total.amount == 0 {
    total.asset = fee.asset;
  } else if total.asset != fee.asset {
    return Err(MixedFeeAssets);
  }
  total.amount = total.amount.saturating_add(fee.amount);
  Ok(())
}
