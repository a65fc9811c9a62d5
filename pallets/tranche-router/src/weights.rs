#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn tranche_and_deposit() -> Weight;
	fn tranche_and_rollover(n: u32) -> Weight;
	fn redeem_tranches() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	/// Storage: bond escrow transfers and tranche mints (r:10 w:10)
	/// Storage: one `PerpetualTranche::deposit` per tranche (r:8 w:14 each, up to 8)
	fn tranche_and_deposit() -> Weight {
		Weight::from_parts(900_000_000, 60000)
			.saturating_add(T::DbWeight::get().reads(74))
			.saturating_add(T::DbWeight::get().writes(122))
	}
	/// Storage: bond escrow transfers and tranche mints (r:10 w:10)
	/// Storage: reserve snapshot plus one `PerpetualTranche::rollover` per trade
	/// The range of component `n` is `[1, 16]`.
	fn tranche_and_rollover(n: u32) -> Weight {
		Weight::from_parts(420_000_000, 24000)
			.saturating_add(Weight::from_parts(150_000_000, 6500).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(30))
			.saturating_add(T::DbWeight::get().reads((9_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes(26))
			.saturating_add(T::DbWeight::get().writes((13_u64).saturating_mul(n.into())))
	}
	fn redeem_tranches() -> Weight {
		Weight::from_parts(250_000_000, 20000)
			.saturating_add(T::DbWeight::get().reads(20))
			.saturating_add(T::DbWeight::get().writes(20))
	}
}

impl WeightInfo for () {
	fn tranche_and_deposit() -> Weight {
		Weight::from_parts(900_000_000, 60000)
			.saturating_add(RocksDbWeight::get().reads(74))
			.saturating_add(RocksDbWeight::get().writes(122))
	}
	fn tranche_and_rollover(n: u32) -> Weight {
		Weight::from_parts(420_000_000, 24000)
			.saturating_add(Weight::from_parts(150_000_000, 6500).saturating_mul(n.into()))
			.saturating_add(RocksDbWeight::get().reads(30))
			.saturating_add(RocksDbWeight::get().reads((9_u64).saturating_mul(n.into())))
			.saturating_add(RocksDbWeight::get().writes(26))
			.saturating_add(RocksDbWeight::get().writes((13_u64).saturating_mul(n.into())))
	}
	fn redeem_tranches() -> Weight {
		Weight::from_parts(250_000_000, 20000)
			.saturating_add(RocksDbWeight::get().reads(20))
			.saturating_add(RocksDbWeight::get().writes(20))
	}
}
