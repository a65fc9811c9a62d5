use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{IssueParams, well_known};

fn schedule() -> IssueParams {
  IssueParams {
    issue_frequency: 1,
    issue_window_offset: 0,
    bond_duration: 3600,
    collateral: well_known::COLLATERAL,
    tranche_ratios: alloc::vec![200, 300, 500].try_into().unwrap_or_default(),
  }
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn issue() {
    Schedule::<T>::put(schedule());
    let caller: T::AccountId = whitelisted_caller();

    #[extrinsic_call]
    issue(RawOrigin::Signed(caller));

    assert_eq!(IssuedCount::<T>::get(), 1);
  }

  #[benchmark]
  fn update_schedule() {
    let new_schedule = schedule();

    #[extrinsic_call]
    update_schedule(RawOrigin::Root, new_schedule.clone());

    assert_eq!(Schedule::<T>::get(), Some(new_schedule));
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
