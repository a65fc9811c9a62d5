//! Asset identifiers shared by the bond issuer, the perpetual tranche and the router.
//!
//! Every token in the system (collateral, perp, bond tranches) is a `pallet-assets`
//! asset addressed by a `u32`. Tranche ids are allocated deterministically from
//! the issuing bond so that a bond factory never needs its own id counter.

use crate::bond::{BondId, MAX_TRANCHES_PER_BOND};

/// Asset id type used by all pallets in this workspace.
pub type AssetId = u32;

// Bitmask Architecture for Asset Classification
//
// 32-bit ID Structure:
// [ 4 bits: Type ] [ 28 bits: Index/ID ]
//
// Types:
// 0x1... -> Collateral tokens
// 0x5... -> Bond tranche tokens (index = bond_id * MAX_TRANCHES_PER_BOND + tranche_index)
// 0x6... -> Perpetual tranche tokens
// 0x7... -> Fee tokens

pub const MASK_TYPE: u32 = 0xF000_0000;
pub const MASK_INDEX: u32 = 0x0FFF_FFFF;

pub const TYPE_COLLATERAL: u32 = 0x1000_0000;
pub const TYPE_TRANCHE: u32 = 0x5000_0000;
pub const TYPE_PERP: u32 = 0x6000_0000;
pub const TYPE_FEE: u32 = 0x7000_0000;

/// Helper to construct compile-time IDs
pub const fn make_id(type_mask: u32, index: u32) -> u32 {
  type_mask | (index & MASK_INDEX)
}

/// Asset id of tranche `index` of bond `bond_id`.
///
/// Returns `None` once the tranche namespace is exhausted.
pub fn tranche_asset_id(bond_id: BondId, index: u8) -> Option<AssetId> {
  let slot = bond_id
    .checked_mul(MAX_TRANCHES_PER_BOND)?
    .checked_add(index as u32)?;
  if slot > MASK_INDEX || index as u32 >= MAX_TRANCHES_PER_BOND {
    return None;
  }
  Some(make_id(TYPE_TRANCHE, slot))
}

/// Inverse of [`tranche_asset_id`].
pub fn tranche_position(asset: AssetId) -> Option<(BondId, u8)> {
  if !is_tranche(asset) {
    return None;
  }
  let slot = asset & MASK_INDEX;
  Some((slot / MAX_TRANCHES_PER_BOND, (slot % MAX_TRANCHES_PER_BOND) as u8))
}

pub fn is_tranche(asset: AssetId) -> bool {
  asset & MASK_TYPE == TYPE_TRANCHE
}

/// Well-known asset constants serving as system defaults
pub mod well_known {
  use super::*;

  pub const COLLATERAL: AssetId = make_id(TYPE_COLLATERAL, 1);
  pub const PERP: AssetId = make_id(TYPE_PERP, 1);
  pub const FEE_TOKEN: AssetId = make_id(TYPE_FEE, 1);
}
