//! Pluggable valuation strategies.
//!
//! The perpetual tranche pallet never inspects a strategy; it only calls these
//! functions through its `Config` associated types.

use crate::{
  assets::AssetId,
  bond::TrancheClass,
  ecosystem::{params::PRICE_UNIT, Balance},
};
use codec::{Decode, Encode, MaxEncodedLen};
use core::marker::PhantomData;
use polkadot_sdk::frame_support::traits::Get;
use scale_info::TypeInfo;
use sp_arithmetic::Permill;

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

/// Fee charged by an operation, denominated in `asset`.
#[derive(Clone, Copy, Debug, Decode, Default, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct FeeQuote {
  pub asset: AssetId,
  pub amount: Balance,
}

impl FeeQuote {
  pub fn is_in(&self, asset: AssetId) -> bool {
    self.asset == asset
  }
}

pub trait FeeStrategy {
  /// Fee for minting `amount` perp.
  fn compute_mint_fee(amount: Balance) -> FeeQuote;
  /// Fee for burning `amount` perp.
  fn compute_burn_fee(amount: Balance) -> FeeQuote;
  /// Fee for a rollover representing `notional` perp.
  fn compute_rollover_fee(notional: Balance) -> FeeQuote;
}

pub trait PricingStrategy {
  /// Unit value of `asset`, scaled by [`PRICE_UNIT`].
  fn compute_price(asset: AssetId) -> Balance;
}

pub trait YieldStrategy {
  /// Share of one unit of a tranche of `class` that backs perp supply, scaled by
  /// `YIELD_UNIT`. Undefined classes yield zero.
  fn compute_yield(class: &TrancheClass) -> Balance;
}

/// Flat percentage fees taken in a single fee asset.
pub struct PercentageFeeStrategy<FeeAsset, MintFee, BurnFee, RolloverFee>(
  PhantomData<(FeeAsset, MintFee, BurnFee, RolloverFee)>,
);

impl<FeeAsset, MintFee, BurnFee, RolloverFee> FeeStrategy
  for PercentageFeeStrategy<FeeAsset, MintFee, BurnFee, RolloverFee>
where
  FeeAsset: Get<AssetId>,
  MintFee: Get<Permill>,
  BurnFee: Get<Permill>,
  RolloverFee: Get<Permill>,
{
  fn compute_mint_fee(amount: Balance) -> FeeQuote {
    FeeQuote { asset: FeeAsset::get(), amount: MintFee::get().mul_floor(amount) }
  }

  fn compute_burn_fee(amount: Balance) -> FeeQuote {
    FeeQuote { asset: FeeAsset::get(), amount: BurnFee::get().mul_floor(amount) }
  }

  fn compute_rollover_fee(notional: Balance) -> FeeQuote {
    FeeQuote { asset: FeeAsset::get(), amount: RolloverFee::get().mul_floor(notional) }
  }
}

/// Prices every reserve token at par.
pub struct UnitPricing;

impl PricingStrategy for UnitPricing {
  fn compute_price(_asset: AssetId) -> Balance {
    PRICE_UNIT
  }
}
