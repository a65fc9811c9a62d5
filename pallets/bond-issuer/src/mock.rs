use crate as pallet_bond_issuer;

use core::time::Duration;
use polkadot_sdk::frame_support::{
  construct_runtime, derive_impl,
  traits::{ConstU32, ConstU128, UnixTime},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{AssetId, BondFactory, BondId, Moment, tranche_asset_id, well_known};
use std::cell::RefCell;

type Block = frame_system::mocking::MockBlock<Test>;

pub const ALICE: u64 = 1;
pub const ASSET_OWNER: u64 = 100;
pub const COLLATERAL: AssetId = well_known::COLLATERAL;

thread_local! {
    // Wall clock in seconds
    pub static NOW: RefCell<Moment> = const { RefCell::new(0) };

    // Bonds handed to the factory: (bond_id, ratios, maturity)
    pub static CREATED_BONDS: RefCell<Vec<(BondId, Vec<u32>, Moment)>> = const { RefCell::new(Vec::new()) };
}

pub fn set_now(secs: Moment) {
  NOW.with(|n| *n.borrow_mut() = secs);
}

pub fn created_bonds() -> Vec<(BondId, Vec<u32>, Moment)> {
  CREATED_BONDS.with(|c| c.borrow().clone())
}

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    BondIssuer: pallet_bond_issuer,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<u128>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = u128;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = frame_system::EnsureRoot<Self::AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

pub struct MockTime;

impl UnixTime for MockTime {
  fn now() -> Duration {
    Duration::from_secs(NOW.with(|n| *n.borrow()))
  }
}

/// Registers every tranche as a sufficient asset owned by `ASSET_OWNER`.
pub struct MockBondFactory;

impl BondFactory for MockBondFactory {
  fn create_bond(
    bond_id: BondId,
    _collateral: AssetId,
    ratios: &[u32],
    maturity: Moment,
  ) -> Result<Vec<AssetId>, DispatchError> {
    let mut assets = Vec::with_capacity(ratios.len());
    for index in 0..ratios.len() {
      let id = tranche_asset_id(bond_id, index as u8).ok_or(DispatchError::Other("tranche id"))?;
      Assets::force_create(RuntimeOrigin::root(), id, ASSET_OWNER, true, 1)?;
      assets.push(id);
    }
    CREATED_BONDS.with(|c| c.borrow_mut().push((bond_id, ratios.to_vec(), maturity)));
    Ok(assets)
  }
}

impl pallet_bond_issuer::Config for Test {
  type BondFactory = MockBondFactory;
  type Time = MockTime;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type WeightInfo = ();
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  new_test_ext_with_schedule(Some((1200, 0, 3600, COLLATERAL, vec![200, 300, 500])))
}

pub fn new_test_ext_with_schedule(
  schedule: Option<(Moment, Moment, Moment, AssetId, Vec<u32>)>,
) -> polkadot_sdk::sp_io::TestExternalities {
  let mut storage = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  pallet_bond_issuer::GenesisConfig::<Test> { schedule, _marker: Default::default() }
    .assimilate_storage(&mut storage)
    .unwrap();

  NOW.with(|n| *n.borrow_mut() = 0);
  CREATED_BONDS.with(|c| c.borrow_mut().clear());

  let mut ext: polkadot_sdk::sp_io::TestExternalities = storage.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
