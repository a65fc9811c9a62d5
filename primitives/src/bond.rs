//! Bond and tranche descriptors.
//!
//! A bond splits one collateral token into an ordered list of tranches whose
//! ratios always sum to [`TRANCHE_RATIO_GRANULARITY`]. Bonds are immutable once
//! issued; the issuer stores them and every other pallet only reads them.

use crate::{
  assets::AssetId,
  ecosystem::{params::TRANCHE_RATIO_GRANULARITY, Balance},
  math::mul_div_floor,
};
use alloc::vec::Vec;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use polkadot_sdk::frame_support::{traits::ConstU32, BoundedVec};
use scale_info::TypeInfo;

/// Sequential identifier of an issued bond (its position in the issuer history).
pub type BondId = u32;

/// Unix time in seconds.
pub type Moment = u64;

pub const MAX_TRANCHES_PER_BOND: u32 = 8;

pub type MaxTranches = ConstU32<MAX_TRANCHES_PER_BOND>;

pub type TrancheRatios = BoundedVec<u32, MaxTranches>;

/// Issuance slot containing `now`: `floor((now - offset) / frequency) * frequency + offset`.
///
/// There is no slot before the first window opens or when `frequency` is zero.
pub fn issuance_slot(now: Moment, frequency: Moment, offset: Moment) -> Option<Moment> {
  if frequency == 0 || now < offset {
    return None;
  }
  let elapsed = now - offset;
  Some(elapsed - elapsed % frequency + offset)
}

/// Ratios are valid when every tranche is non-empty and they sum to the granularity.
pub fn ratios_are_valid(ratios: &[u32]) -> bool {
  !ratios.is_empty()
    && ratios.len() as u32 <= MAX_TRANCHES_PER_BOND
    && ratios.iter().all(|r| *r > 0)
    && ratios.iter().map(|r| *r as u64).sum::<u64>() == TRANCHE_RATIO_GRANULARITY as u64
}

/// Issuance schedule of a bond issuer.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
pub struct IssueParams {
  /// Seconds between two consecutive issuance windows.
  pub issue_frequency: Moment,
  /// Offset aligning the windows to wall-clock time.
  pub issue_window_offset: Moment,
  /// Seconds between issuance and maturity.
  pub bond_duration: Moment,
  pub collateral: AssetId,
  pub tranche_ratios: TrancheRatios,
}

impl IssueParams {
  pub fn slot_at(&self, now: Moment) -> Option<Moment> {
    issuance_slot(now, self.issue_frequency, self.issue_window_offset)
  }
}

#[derive(Clone, Copy, Debug, Decode, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen)]
pub struct TrancheInfo {
  pub asset: AssetId,
  pub ratio: u32,
}

/// Tranches with the same collateral, ratio vector and index share a class and
/// therefore a yield entry, whichever bond they come from.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
pub struct TrancheClass {
  pub collateral: AssetId,
  pub ratios: TrancheRatios,
  pub index: u8,
}

#[derive(Clone, Debug, Decode, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen)]
pub struct BondInfo {
  pub collateral: AssetId,
  pub tranches: BoundedVec<TrancheInfo, MaxTranches>,
  pub issued_at: Moment,
  pub maturity: Moment,
}

impl BondInfo {
  pub fn is_mature(&self, now: Moment) -> bool {
    now >= self.maturity
  }

  /// Residual time to maturity, zero once mature.
  pub fn time_to_maturity(&self, now: Moment) -> Moment {
    self.maturity.saturating_sub(now)
  }

  pub fn tranche_index(&self, asset: AssetId) -> Option<u8> {
    self.tranches.iter().position(|t| t.asset == asset).map(|i| i as u8)
  }

  pub fn contains(&self, asset: AssetId) -> bool {
    self.tranche_index(asset).is_some()
  }

  pub fn ratios(&self) -> TrancheRatios {
    // Same bound as `tranches`, so the conversion cannot truncate.
    BoundedVec::truncate_from(self.tranches.iter().map(|t| t.ratio).collect())
  }

  pub fn tranche_class(&self, index: u8) -> Option<TrancheClass> {
    if index as usize >= self.tranches.len() {
      return None;
    }
    Some(TrancheClass { collateral: self.collateral, ratios: self.ratios(), index })
  }

  /// Tranche amounts produced by depositing `collateral_amount` into the bond.
  pub fn tranche_amounts(&self, collateral_amount: Balance) -> Vec<(AssetId, Balance)> {
    self
      .tranches
      .iter()
      .map(|t| {
        let amount = mul_div_floor(
          collateral_amount,
          t.ratio as Balance,
          TRANCHE_RATIO_GRANULARITY as Balance,
        );
        (t.asset, amount)
      })
      .collect()
  }

  /// Amounts redeemable before maturity out of `balances` (one per tranche, in tranche order).
  ///
  /// Immature bonds only redeem complete slices of the ratio vector, so every tranche is
  /// scaled by the smallest `balance / ratio` across the bond.
  pub fn proportional_redemption(&self, balances: &[Balance]) -> Vec<Balance> {
    if balances.len() != self.tranches.len() {
      return Vec::new();
    }
    let granularity = TRANCHE_RATIO_GRANULARITY as Balance;
    let min_scalar = self
      .tranches
      .iter()
      .zip(balances)
      .map(|(t, b)| mul_div_floor(*b, granularity, t.ratio as Balance))
      .min()
      .unwrap_or(0);
    self
      .tranches
      .iter()
      .map(|t| mul_div_floor(t.ratio as Balance, min_scalar, granularity))
      .collect()
  }
}
