//! Ecosystem Constants for the perpetual tranche system
//!
//! This module centralizes pallet IDs and the fixed-point units shared by every
//! valuation in the system.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// These IDs are used by Polkadot SDK's `PalletId::into_account_truncating()`
/// to deterministically generate accounts for pallet-specific operations.
pub mod pallet_ids {
  /// Perpetual tranche reserve account
  pub const PERPETUAL_TRANCHE_PALLET_ID: &[u8; 8] = b"perpresv";

  /// Bond escrow used by the default bond controller
  pub const BOND_ESCROW_ID: &[u8; 8] = b"bondescr";
}

/// Ecosystem parameters defining mathematical constants and thresholds.
pub mod params {
  use super::Balance;

  /// Fixed-point unit of a tranche yield (10^9 == 1.0).
  ///
  /// A tranche with yield `YIELD_UNIT` backs one perp per tranche unit.
  pub const YIELD_UNIT: Balance = 1_000_000_000;

  /// Fixed-point unit of a reserve token price (10^8 == 1.0).
  pub const PRICE_UNIT: Balance = 100_000_000;

  /// Tranche ratios of a bond always sum to this many parts.
  pub const TRANCHE_RATIO_GRANULARITY: u32 = 1_000;

  /// Default lower bound of the tolerated residual maturity (seconds).
  pub const DEFAULT_MIN_TRANCHE_MATURITY: u64 = 1;

  /// Default upper bound of the tolerated residual maturity (seconds).
  pub const DEFAULT_MAX_TRANCHE_MATURITY: u64 = u64::MAX;
}
