use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::Get;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{TrancheClass, params::YIELD_UNIT};

const AMOUNT: u128 = 1_000_000;

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn deposit() -> Result<(), BenchmarkError> {
    let caller: T::AccountId = whitelisted_caller();
    let tranche = T::BenchmarkHelper::setup_deposit(&caller, AMOUNT)?;

    #[extrinsic_call]
    deposit(RawOrigin::Signed(caller), tranche, AMOUNT);

    assert!(Pallet::<T>::in_reserve(tranche));
    Ok(())
  }

  #[benchmark]
  fn burn(n: Linear<1, { T::MaxReserveTokens::get() }>) -> Result<(), BenchmarkError> {
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::seed_reserve(&caller, n, AMOUNT)?;
    let backing: u128 = Pallet::<T>::reserve_snapshot().iter().map(|e| e.backing()).sum();

    #[extrinsic_call]
    burn(RawOrigin::Signed(caller), backing, Some(n));

    assert_eq!(Pallet::<T>::reserve_count(), 0);
    Ok(())
  }

  /// Drains the oldest token of a full ledger for a tranche of a fresh bond.
  #[benchmark]
  fn rollover() -> Result<(), BenchmarkError> {
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::seed_reserve(&caller, T::MaxReserveTokens::get(), AMOUNT)?;
    T::BenchmarkHelper::mature_reserve();
    let tranche = T::BenchmarkHelper::setup_deposit(&caller, AMOUNT)?;
    let token_out = Pallet::<T>::reserve_at(0).ok_or(BenchmarkError::Weightless)?;

    #[extrinsic_call]
    rollover(RawOrigin::Signed(caller), tranche, token_out, AMOUNT, AMOUNT);

    assert!(!Pallet::<T>::in_reserve(token_out));
    assert!(Pallet::<T>::in_reserve(tranche));
    Ok(())
  }

  #[benchmark]
  fn poke_deposit_bond() {
    let caller: T::AccountId = whitelisted_caller();

    #[extrinsic_call]
    poke_deposit_bond(RawOrigin::Signed(caller));

    assert!(DepositBond::<T>::get().is_some());
  }

  #[benchmark]
  fn update_tolerable_tranche_maturity() -> Result<(), BenchmarkError> {
    let origin =
      T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    update_tolerable_tranche_maturity(origin as T::RuntimeOrigin, 10, 100);

    assert_eq!(MinTrancheMaturity::<T>::get(), 10);
    Ok(())
  }

  #[benchmark]
  fn update_defined_yield() -> Result<(), BenchmarkError> {
    let origin =
      T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
    let class = TrancheClass {
      collateral: 0,
      ratios: alloc::vec![1000].try_into().map_err(|_| BenchmarkError::Weightless)?,
      index: 0,
    };

    #[extrinsic_call]
    update_defined_yield(origin as T::RuntimeOrigin, class.clone(), Some(YIELD_UNIT));

    assert_eq!(DefinedYields::<T>::get(&class), Some(YIELD_UNIT));
    Ok(())
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
