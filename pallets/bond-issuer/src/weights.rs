#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn issue() -> Weight;
	fn update_schedule() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	/// Storage: `BondIssuer::Schedule`, `BondIssuer::LastIssueSlot`, `BondIssuer::IssuedCount` (r:3)
	/// Storage: `BondIssuer::IssuedBonds`, `BondIssuer::TrancheBonds` (w:10), factory asset creation
	fn issue() -> Weight {
		Weight::from_parts(85_000_000, 6000)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(11))
	}
	fn update_schedule() -> Weight {
		Weight::from_parts(15_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
}

impl WeightInfo for () {
	fn issue() -> Weight {
		Weight::from_parts(85_000_000, 6000)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(11))
	}
	fn update_schedule() -> Weight {
		Weight::from_parts(15_000_000, 1500)
	}
}
