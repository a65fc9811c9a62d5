//! Reserve ledger: the ordered token set and tracked balances of the reserve account.

use crate::{Config, Error, Event, Pallet, ReserveBalances, ReserveTokens};
use frame::deps::{
  frame_support::traits::{fungibles::Inspect, fungibles::Mutate, tokens::Preservation},
  sp_runtime::{DispatchError, DispatchResult},
};
use primitives::{AssetId, Balance};

impl<T: Config> Pallet<T> {
  pub fn in_reserve(asset: AssetId) -> bool {
    ReserveTokens::<T>::get().contains(&asset)
  }

  pub fn reserve_count() -> u32 {
    ReserveTokens::<T>::decode_len().unwrap_or(0) as u32
  }

  /// Token at position `index` of the ledger.
  pub fn reserve_at(index: u32) -> Option<AssetId> {
    ReserveTokens::<T>::get().get(index as usize).copied()
  }

  pub fn reserve_balance(asset: AssetId) -> Balance {
    ReserveBalances::<T>::get(asset)
  }

  /// Aligns the ledger entry of `asset` with the reserve account's actual holdings.
  ///
  /// A token enters the ledger on its first positive balance and leaves it once drained;
  /// the relative order of the remaining tokens never changes.
  pub(crate) fn sync_reserve(asset: AssetId) -> DispatchResult {
    let balance = T::Assets::balance(asset, &Self::account_id());

    ReserveTokens::<T>::try_mutate(|tokens| -> DispatchResult {
      match (tokens.iter().position(|listed| *listed == asset), balance > 0) {
        (None, true) => tokens.try_push(asset).map_err(|_| Error::<T>::ReserveLimitReached)?,
        (Some(index), false) => {
          tokens.remove(index);
        },
        _ => {},
      }
      Ok(())
    })?;

    if balance > 0 {
      ReserveBalances::<T>::insert(asset, balance);
    } else {
      ReserveBalances::<T>::remove(asset);
    }
    Self::deposit_event(Event::ReserveSynced { asset, balance });
    Ok(())
  }

  /// Syncs each distinct asset once, in the given order.
  ///
  /// Callers list drained tokens ahead of incoming ones so a full ledger frees its slots
  /// before new tokens claim them.
  pub(crate) fn sync_touched(assets: &[AssetId]) -> DispatchResult {
    for (index, asset) in assets.iter().enumerate() {
      if !assets[..index].contains(asset) {
        Self::sync_reserve(*asset)?;
      }
    }
    Ok(())
  }

  /// Moves `amount` of `asset` from `who` into the reserve account without syncing.
  pub(crate) fn receive(who: &T::AccountId, asset: AssetId, amount: Balance) -> DispatchResult {
    T::Assets::transfer(asset, who, &Self::account_id(), amount, Preservation::Expendable)?;
    Ok(())
  }

  /// Moves `amount` of `asset` from the reserve account to `who` without syncing.
  pub(crate) fn release(who: &T::AccountId, asset: AssetId, amount: Balance) -> DispatchResult {
    T::Assets::transfer(asset, &Self::account_id(), who, amount, Preservation::Expendable)?;
    Ok(())
  }

  pub(crate) fn transfer_in(who: &T::AccountId, asset: AssetId, amount: Balance) -> DispatchResult {
    Self::receive(who, asset, amount)?;
    Self::sync_reserve(asset)
  }

  /// Moves a fee into the reserve. Returns the asset to sync when the fee is in the perp
  /// or in a tracked token.
  pub(crate) fn take_fee(
    who: &T::AccountId,
    fee: primitives::FeeQuote,
  ) -> Result<Option<AssetId>, DispatchError> {
    if fee.amount == 0 {
      return Ok(None);
    }
    Self::receive(who, fee.asset, fee.amount)?;
    let tracked = fee.asset == Self::perp_asset() || Self::in_reserve(fee.asset);
    Ok(tracked.then_some(fee.asset))
  }

  pub(crate) fn collect_fee(who: &T::AccountId, fee: primitives::FeeQuote) -> DispatchResult {
    match Self::take_fee(who, fee)? {
      Some(asset) => Self::sync_reserve(asset),
      None => Ok(()),
    }
  }

  #[cfg(any(feature = "try-runtime", test))]
  pub fn do_try_state() -> Result<(), frame::deps::sp_runtime::TryRuntimeError> {
    let tokens = ReserveTokens::<T>::get();
    let account = Self::account_id();
    for (index, asset) in tokens.iter().enumerate() {
      frame::prelude::ensure!(
        !tokens[..index].contains(asset),
        "reserve token listed twice"
      );
      let tracked = ReserveBalances::<T>::get(asset);
      frame::prelude::ensure!(tracked > 0, "drained token left in reserve ledger");
      frame::prelude::ensure!(
        tracked == T::Assets::balance(*asset, &account),
        "tracked reserve balance differs from holdings"
      );
    }
    frame::prelude::ensure!(
      ReserveBalances::<T>::iter_keys().all(|asset| tokens.contains(&asset)),
      "balance tracked for unlisted token"
    );
    Ok(())
  }
}
