#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn deposit() -> Weight;
	fn burn(n: u32) -> Weight;
	fn rollover() -> Weight;
	fn poke_deposit_bond() -> Weight;
	fn update_tolerable_tranche_maturity() -> Weight;
	fn update_defined_yield() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	/// Storage: `BondIssuer::*` issuance (r:3 w:11), `PerpetualTranche::DepositBond` (r:1 w:1)
	/// Storage: `PerpetualTranche::ReserveTokens`, `PerpetualTranche::ReserveBalances` (r:2 w:2)
	/// Storage: `Assets::Account` (r:4 w:4), `PerpetualTranche::DefinedYields` (r:1)
	fn deposit() -> Weight {
		Weight::from_parts(160_000_000, 12000)
			.saturating_add(T::DbWeight::get().reads(11))
			.saturating_add(T::DbWeight::get().writes(18))
	}
	/// The range of component `n` is `[1, 16]`.
	fn burn(n: u32) -> Weight {
		Weight::from_parts(70_000_000, 6000)
			.saturating_add(Weight::from_parts(38_000_000, 2600).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(4))
			.saturating_add(T::DbWeight::get().reads((5_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes(4))
			.saturating_add(T::DbWeight::get().writes((4_u64).saturating_mul(n.into())))
	}
	fn rollover() -> Weight {
		Weight::from_parts(190_000_000, 14000)
			.saturating_add(T::DbWeight::get().reads(16))
			.saturating_add(T::DbWeight::get().writes(22))
	}
	fn poke_deposit_bond() -> Weight {
		Weight::from_parts(95_000_000, 7000)
			.saturating_add(T::DbWeight::get().reads(5))
			.saturating_add(T::DbWeight::get().writes(12))
	}
	fn update_tolerable_tranche_maturity() -> Weight {
		Weight::from_parts(14_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(2))
	}
	fn update_defined_yield() -> Weight {
		Weight::from_parts(16_000_000, 3500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
}

impl WeightInfo for () {
	fn deposit() -> Weight {
		Weight::from_parts(160_000_000, 12000)
			.saturating_add(RocksDbWeight::get().reads(11))
			.saturating_add(RocksDbWeight::get().writes(18))
	}
	fn burn(n: u32) -> Weight {
		Weight::from_parts(70_000_000, 6000)
			.saturating_add(Weight::from_parts(38_000_000, 2600).saturating_mul(n.into()))
			.saturating_add(RocksDbWeight::get().reads((5_u64).saturating_mul(n.into())))
			.saturating_add(RocksDbWeight::get().writes((4_u64).saturating_mul(n.into())))
	}
	fn rollover() -> Weight {
		Weight::from_parts(190_000_000, 14000)
			.saturating_add(RocksDbWeight::get().reads(16))
			.saturating_add(RocksDbWeight::get().writes(22))
	}
	fn poke_deposit_bond() -> Weight {
		Weight::from_parts(95_000_000, 7000)
			.saturating_add(RocksDbWeight::get().reads(5))
			.saturating_add(RocksDbWeight::get().writes(12))
	}
	fn update_tolerable_tranche_maturity() -> Weight {
		Weight::from_parts(14_000_000, 1500)
	}
	fn update_defined_yield() -> Weight {
		Weight::from_parts(16_000_000, 3500)
	}
}
