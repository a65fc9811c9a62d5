use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{BondController, PerpetualTrancheInterface};

const COLLATERAL_AMOUNT: u128 = 1_000_000;
const SEED_AMOUNT: u128 = 10_000;

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn tranche_and_deposit() -> Result<(), BenchmarkError> {
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::fund(&caller, COLLATERAL_AMOUNT)?;

    #[extrinsic_call]
    tranche_and_deposit(RawOrigin::Signed(caller), COLLATERAL_AMOUNT, u128::MAX);

    Ok(())
  }

  /// Every seeded token is drained, so the plan runs at least `n` trades.
  #[benchmark]
  fn tranche_and_rollover(n: Linear<1, { T::Perp::max_reserve_tokens() }>) -> Result<(), BenchmarkError> {
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::seed_rollover_reserve(&caller, n, SEED_AMOUNT)?;
    T::BenchmarkHelper::fund(&caller, COLLATERAL_AMOUNT)?;
    assert_eq!(T::Perp::reserve_tokens_up_for_rollover().len() as u32, n);

    #[extrinsic_call]
    tranche_and_rollover(RawOrigin::Signed(caller), COLLATERAL_AMOUNT, u128::MAX);

    assert!(T::Perp::reserve_tokens_up_for_rollover().is_empty());
    Ok(())
  }

  #[benchmark]
  fn redeem_tranches() -> Result<(), BenchmarkError> {
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::fund(&caller, COLLATERAL_AMOUNT)?;
    let (bond_id, bond) = T::Perp::deposit_bond()?;
    T::BondController::tranche(&caller, &bond, COLLATERAL_AMOUNT)?;

    #[extrinsic_call]
    redeem_tranches(RawOrigin::Signed(caller), bond_id);

    Ok(())
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
