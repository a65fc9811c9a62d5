use crate as pallet_perpetual_tranche;

use core::time::Duration;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl, parameter_types,
  traits::{ConstU32, ConstU64, ConstU128, Get, UnixTime, fungibles::Mutate},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{
  AssetId, Balance, BondFactory, BondId, FeeQuote, FeeStrategy, Moment, PricingStrategy,
  pallet_ids::PERPETUAL_TRANCHE_PALLET_ID,
  params::{self, PRICE_UNIT, YIELD_UNIT},
  tranche_asset_id, well_known,
};
use std::cell::RefCell;
use std::collections::BTreeMap;

type Block = frame_system::mocking::MockBlock<Test>;

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const ASSET_OWNER: u64 = 100;

pub const COLLATERAL: AssetId = well_known::COLLATERAL;
pub const PERP: AssetId = well_known::PERP;
pub const FEE_TOKEN: AssetId = well_known::FEE_TOKEN;

/// Issuance window and bond duration of the mock schedule.
pub const WINDOW: Moment = 1200;
pub const DURATION: Moment = 3600;

pub const SENIOR_YIELD: Balance = YIELD_UNIT;
pub const JUNIOR_YIELD: Balance = YIELD_UNIT * 3 / 4;

thread_local! {
    // Wall clock in seconds
    pub static NOW: RefCell<Moment> = const { RefCell::new(0) };

    // Flat fees: (asset, mint, burn, rollover)
    pub static FEES: RefCell<(AssetId, Balance, Balance, Balance)> = const { RefCell::new((PERP, 0, 0, 0)) };

    // Price overrides, PRICE_UNIT otherwise
    pub static PRICES: RefCell<BTreeMap<AssetId, Balance>> = const { RefCell::new(BTreeMap::new()) };

    // Ledger capacity
    pub static MAX_RESERVE_TOKENS: RefCell<u32> = const { RefCell::new(16) };
}

pub fn set_now(secs: Moment) {
  NOW.with(|n| *n.borrow_mut() = secs);
}

pub fn set_fees(asset: AssetId, mint: Balance, burn: Balance, rollover: Balance) {
  FEES.with(|f| *f.borrow_mut() = (asset, mint, burn, rollover));
}

/// Shrinks the ledger capacity. Call before the reserve holds more tokens than `max`.
pub fn set_max_reserve_tokens(max: u32) {
  MAX_RESERVE_TOKENS.with(|m| *m.borrow_mut() = max);
}

pub struct ReserveCapacity;
impl Get<u32> for ReserveCapacity {
  fn get() -> u32 {
    MAX_RESERVE_TOKENS.with(|m| *m.borrow())
  }
}

pub fn set_price(asset: AssetId, price: Balance) {
  PRICES.with(|p| {
    p.borrow_mut().insert(asset, price);
  });
}

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    BondIssuer: pallet_bond_issuer,
    PerpetualTranche: pallet_perpetual_tranche,
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
    _maturity: Moment,
  ) -> Result<Vec<AssetId>, DispatchError> {
    let mut assets = Vec::with_capacity(ratios.len());
    for index in 0..ratios.len() {
      let id = tranche_asset_id(bond_id, index as u8).ok_or(DispatchError::Other("tranche id"))?;
      Assets::force_create(RuntimeOrigin::root(), id, ASSET_OWNER, true, 1)?;
      assets.push(id);
    }
    Ok(assets)
  }
}

impl pallet_bond_issuer::Config for Test {
  type BondFactory = MockBondFactory;
  type Time = MockTime;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type WeightInfo = ();
}

pub struct MockFeeStrategy;

impl FeeStrategy for MockFeeStrategy {
  fn compute_mint_fee(_amount: Balance) -> FeeQuote {
    let (asset, mint, _, _) = FEES.with(|f| *f.borrow());
    FeeQuote { asset, amount: mint }
  }

  fn compute_burn_fee(_amount: Balance) -> FeeQuote {
    let (asset, _, burn, _) = FEES.with(|f| *f.borrow());
    FeeQuote { asset, amount: burn }
  }

  fn compute_rollover_fee(_notional: Balance) -> FeeQuote {
    let (asset, _, _, rollover) = FEES.with(|f| *f.borrow());
    FeeQuote { asset, amount: rollover }
  }
}

pub struct MockPricing;

impl PricingStrategy for MockPricing {
  fn compute_price(asset: AssetId) -> Balance {
    PRICES.with(|p| p.borrow().get(&asset).copied().unwrap_or(PRICE_UNIT))
  }
}

parameter_types! {
  pub const PerpetualTranchePalletId: PalletId = PalletId(*PERPETUAL_TRANCHE_PALLET_ID);
  pub const PerpAsset: AssetId = PERP;
}

impl pallet_perpetual_tranche::Config for Test {
  type Assets = Assets;
  type BondIssuer = BondIssuer;
  type FeeStrategy = MockFeeStrategy;
  type PricingStrategy = MockPricing;
  type YieldStrategy = pallet_perpetual_tranche::DefinedYieldTable<Test>;
  type Time = MockTime;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type PalletId = PerpetualTranchePalletId;
  type PerpAsset = PerpAsset;
  type MaxReserveTokens = ReserveCapacity;
  type DefaultMinTrancheMaturity = ConstU64<{ params::DEFAULT_MIN_TRANCHE_MATURITY }>;
  type DefaultMaxTrancheMaturity = ConstU64<{ params::DEFAULT_MAX_TRANCHE_MATURITY }>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = PerpBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct PerpBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl pallet_perpetual_tranche::BenchmarkHelper<u64> for PerpBenchmarkHelper {
  fn setup_deposit(who: &u64, amount: u128) -> Result<u32, DispatchError> {
    let (_, bond) = PerpetualTranche::update_deposit_bond()?;
    for tranche in bond.tranches.iter() {
      Assets::mint_into(tranche.asset, who, amount)?;
    }
    Assets::mint_into(PERP, who, amount)?;
    Assets::mint_into(FEE_TOKEN, who, amount)?;
    Ok(bond.tranches[0].asset)
  }

  fn seed_reserve(who: &u64, n: u32, amount: u128) -> polkadot_sdk::sp_runtime::DispatchResult {
    while PerpetualTranche::reserve_count() < n {
      let (_, bond) = PerpetualTranche::update_deposit_bond()?;
      for tranche in bond.tranches.iter() {
        if PerpetualTranche::reserve_count() < n {
          Assets::mint_into(tranche.asset, who, amount)?;
          PerpetualTranche::do_deposit(who, tranche.asset, amount)?;
        }
      }
      set_now(NOW.with(|t| *t.borrow()) + WINDOW);
    }
    Ok(())
  }

  fn mature_reserve() {
    set_now(NOW.with(|t| *t.borrow()) + DURATION);
  }
}

/// Senior (index 0) and junior (index 1) tranche of `bond_id` under the mock schedule.
pub fn tranches_of(bond_id: BondId) -> (AssetId, AssetId) {
  (
    tranche_asset_id(bond_id, 0).unwrap(),
    tranche_asset_id(bond_id, 1).unwrap(),
  )
}

/// Mints `amount` of `asset` to `who`.
pub fn fund(who: u64, asset: AssetId, amount: Balance) {
  Assets::mint_into(asset, &who, amount).unwrap();
}

pub fn balance_of(who: u64, asset: AssetId) -> Balance {
  <Assets as polkadot_sdk::frame_support::traits::fungibles::Inspect<u64>>::balance(asset, &who)
}

pub fn reserve_holdings(asset: AssetId) -> Balance {
  balance_of(PerpetualTranche::account_id(), asset)
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut storage = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: vec![
      (COLLATERAL, ASSET_OWNER, true, 1),
      (PERP, ASSET_OWNER, true, 1),
      (FEE_TOKEN, ASSET_OWNER, true, 1),
    ],
    metadata: vec![],
    accounts: vec![],
    reserves: vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut storage)
  .unwrap();

  pallet_bond_issuer::GenesisConfig::<Test> {
    schedule: Some((WINDOW, 0, DURATION, COLLATERAL, vec![500, 500])),
    _marker: Default::default(),
  }
  .assimilate_storage(&mut storage)
  .unwrap();

  pallet_perpetual_tranche::GenesisConfig::<Test> {
    tolerable_tranche_maturity: None,
    defined_yields: vec![
      (COLLATERAL, vec![500, 500], 0, SENIOR_YIELD),
      (COLLATERAL, vec![500, 500], 1, JUNIOR_YIELD),
    ],
    _marker: Default::default(),
  }
  .assimilate_storage(&mut storage)
  .unwrap();

  NOW.with(|n| *n.borrow_mut() = 0);
  FEES.with(|f| *f.borrow_mut() = (PERP, 0, 0, 0));
  PRICES.with(|p| p.borrow_mut().clear());
  MAX_RESERVE_TOKENS.with(|m| *m.borrow_mut() = 16);

  let mut ext: polkadot_sdk::sp_io::TestExternalities = storage.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
