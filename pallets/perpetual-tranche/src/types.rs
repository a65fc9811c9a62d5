use crate::{Config, DefinedYields};
use core::marker::PhantomData;
use primitives::{Balance, TrancheClass, YieldStrategy};

/// Yield strategy reading the admin-managed [`DefinedYields`] table.
///
/// Classes without an entry yield zero, which makes their tokens unacceptable for deposits
/// and eligible for rollover out of the reserve.
pub struct DefinedYieldTable<T>(PhantomData<T>);

impl<T: Config> YieldStrategy for DefinedYieldTable<T> {
  fn compute_yield(class: &TrancheClass) -> Balance {
    DefinedYields::<T>::get(class).unwrap_or(0)
  }
}
