//! Bond Issuer Pallet
//!
//! Issues fixed-maturity tranched bonds on a deterministic schedule.
//!
//! Time is cut into issuance windows of `issue_frequency` seconds aligned to
//! `issue_window_offset`. The first `issue` call inside a window asks the configured
//! [`BondFactory`](primitives::BondFactory) to materialize the tranche tokens and records
//! the bond; later calls inside the same window are no-ops. Issued bonds are kept forever
//! and are addressed by their position in the issuance history.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::bond-issuer";

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, WeightInfo};
  use alloc::vec::Vec;
  use frame::deps::{frame_support::traits::UnixTime, sp_runtime::DispatchError};
  use frame::prelude::*;
  use primitives::{
    AssetId, BondFactory, BondId, BondInfo, BondIssuerInterface, IssueParams, MaxTranches, Moment,
    TrancheInfo, TrancheRatios, ratios_are_valid,
  };

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Creates the tranche tokens of every issued bond
    type BondFactory: BondFactory;

    /// Wall-clock source used to locate the current issuance window
    type Time: UnixTime;

    /// Origin allowed to change the issuance schedule
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  /// Issuance schedule, `None` until configured
  #[pallet::storage]
  pub type Schedule<T> = StorageValue<_, IssueParams, OptionQuery>;

  /// Window start of the most recent issuance
  #[pallet::storage]
  pub type LastIssueSlot<T> = StorageValue<_, Moment, OptionQuery>;

  /// Number of bonds issued so far; also the id of the next bond
  #[pallet::storage]
  #[pallet::getter(fn issued_count)]
  pub type IssuedCount<T> = StorageValue<_, u32, ValueQuery>;

  /// Issuance history
  #[pallet::storage]
  pub type IssuedBonds<T> = StorageMap<_, Twox64Concat, BondId, BondInfo, OptionQuery>;

  /// Reverse index from tranche asset to its bond and tranche position
  #[pallet::storage]
  pub type TrancheBonds<T> = StorageMap<_, Blake2_128Concat, AssetId, (BondId, u8), OptionQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A bond was issued for a new window
    BondIssued {
      bond_id: BondId,
      collateral: AssetId,
      issued_at: Moment,
      maturity: Moment,
      tranches: u32,
    },
    /// The issuance schedule was replaced
    ScheduleUpdated {
      old_schedule: Option<IssueParams>,
      new_schedule: IssueParams,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// No bond has been issued yet
    NoBondIssued,
    /// The issuance schedule has not been configured
    IssuerNotConfigured,
    /// Issue frequency must be positive
    InvalidIssueFrequency,
    /// Bond duration must be positive
    InvalidBondDuration,
    /// Ratios must be positive and sum to the ratio granularity
    InvalidTrancheRatios,
    /// More tranches than a bond can hold
    TooManyTranches,
    /// The factory returned a different number of tranches than requested
    FactoryMismatch,
    /// The bond id space is exhausted
    BondIdOverflow,
    /// Arithmetic overflow occurred
    ArithmeticOverflow,
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    #[cfg(feature = "try-runtime")]
    fn try_state(_n: BlockNumberFor<T>) -> Result<(), frame::deps::sp_runtime::TryRuntimeError> {
      Self::do_try_state()
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Issue the bond of the current window if it does not exist yet.
    ///
    /// Callable by anyone. Calls inside an already served window succeed without effect.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::issue())]
    pub fn issue(origin: OriginFor<T>) -> DispatchResult {
      ensure_signed(origin)?;
      Self::do_issue()?;
      Ok(())
    }

    /// Replace the issuance schedule.
    ///
    /// Windows already served stay served: a new bond is only issued once the schedule
    /// yields a window later than the last issuance.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::update_schedule())]
    pub fn update_schedule(origin: OriginFor<T>, schedule: IssueParams) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      Self::ensure_valid_schedule(&schedule)?;

      let old_schedule = Schedule::<T>::get();
      Schedule::<T>::put(&schedule);
      Self::deposit_event(Event::ScheduleUpdated { old_schedule, new_schedule: schedule });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn ensure_valid_schedule(schedule: &IssueParams) -> DispatchResult {
      ensure!(schedule.issue_frequency > 0, Error::<T>::InvalidIssueFrequency);
      ensure!(schedule.bond_duration > 0, Error::<T>::InvalidBondDuration);
      ensure!(ratios_are_valid(&schedule.tranche_ratios), Error::<T>::InvalidTrancheRatios);
      Ok(())
    }

    pub fn now() -> Moment {
      T::Time::now().as_secs()
    }

    /// Issues the bond of the current window.
    ///
    /// Returns the id of the new bond, or `None` when the current window has already been
    /// served or the first window has not opened yet.
    pub fn do_issue() -> Result<Option<BondId>, DispatchError> {
      let schedule = Schedule::<T>::get().ok_or(Error::<T>::IssuerNotConfigured)?;
      let Some(slot) = schedule.slot_at(Self::now()) else {
        return Ok(None);
      };
      if LastIssueSlot::<T>::get().is_some_and(|last| slot <= last) {
        return Ok(None);
      }

      let bond_id = IssuedCount::<T>::get();
      let next_id = bond_id.checked_add(1).ok_or(Error::<T>::BondIdOverflow)?;
      let maturity = slot
        .checked_add(schedule.bond_duration)
        .ok_or(Error::<T>::ArithmeticOverflow)?;

      let assets = T::BondFactory::create_bond(
        bond_id,
        schedule.collateral,
        &schedule.tranche_ratios,
        maturity,
      )?;
      ensure!(assets.len() == schedule.tranche_ratios.len(), Error::<T>::FactoryMismatch);

      let tranches: BoundedVec<TrancheInfo, MaxTranches> = assets
        .iter()
        .zip(schedule.tranche_ratios.iter())
        .map(|(asset, ratio)| TrancheInfo { asset: *asset, ratio: *ratio })
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|_| Error::<T>::TooManyTranches)?;

      for (index, tranche) in tranches.iter().enumerate() {
        TrancheBonds::<T>::insert(tranche.asset, (bond_id, index as u8));
      }
      let tranche_count = tranches.len() as u32;
      IssuedBonds::<T>::insert(
        bond_id,
        BondInfo { collateral: schedule.collateral, tranches, issued_at: slot, maturity },
      );
      IssuedCount::<T>::put(next_id);
      LastIssueSlot::<T>::put(slot);

      log::info!(
        target: LOG_TARGET,
        "issued bond {} for window {} maturing at {}",
        bond_id,
        slot,
        maturity,
      );
      Self::deposit_event(Event::BondIssued {
        bond_id,
        collateral: schedule.collateral,
        issued_at: slot,
        maturity,
        tranches: tranche_count,
      });
      Ok(Some(bond_id))
    }

    pub fn latest_bond_id() -> Result<BondId, DispatchError> {
      IssuedCount::<T>::get()
        .checked_sub(1)
        .ok_or_else(|| Error::<T>::NoBondIssued.into())
    }

    /// Bond at position `index` of the issuance history.
    pub fn issued_bond_at(index: u32) -> Option<BondInfo> {
      IssuedBonds::<T>::get(index)
    }

    pub fn is_instance(bond_id: BondId) -> bool {
      IssuedBonds::<T>::contains_key(bond_id)
    }

    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), frame::deps::sp_runtime::TryRuntimeError> {
      let count = IssuedCount::<T>::get();
      for bond_id in 0..count {
        let bond = IssuedBonds::<T>::get(bond_id).ok_or("issued bond missing from history")?;
        for (index, tranche) in bond.tranches.iter().enumerate() {
          ensure!(
            TrancheBonds::<T>::get(tranche.asset) == Some((bond_id, index as u8)),
            "tranche index out of sync with bond history"
          );
        }
      }
      ensure!(!IssuedBonds::<T>::contains_key(count), "bond recorded past issued count");
      Ok(())
    }
  }

  impl<T: Config> BondIssuerInterface for Pallet<T> {
    fn issue() -> Result<BondId, DispatchError> {
      Self::do_issue()?;
      Self::latest_bond_id()
    }

    fn latest_bond() -> Result<BondId, DispatchError> {
      Self::latest_bond_id()
    }

    fn bond(bond_id: BondId) -> Option<BondInfo> {
      IssuedBonds::<T>::get(bond_id)
    }

    fn locate_tranche(asset: AssetId) -> Option<(BondId, u8)> {
      TrancheBonds::<T>::get(asset)
    }
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// Optional initial schedule: frequency, window offset, bond duration, collateral, ratios
    pub schedule: Option<(Moment, Moment, Moment, AssetId, Vec<u32>)>,
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      if let Some((frequency, offset, duration, collateral, ratios)) = &self.schedule {
        let tranche_ratios: TrancheRatios =
          ratios.clone().try_into().expect("genesis tranche ratios exceed bond capacity");
        let schedule = IssueParams {
          issue_frequency: *frequency,
          issue_window_offset: *offset,
          bond_duration: *duration,
          collateral: *collateral,
          tranche_ratios,
        };
        assert!(
          Pallet::<T>::ensure_valid_schedule(&schedule).is_ok(),
          "invalid genesis issuance schedule"
        );
        Schedule::<T>::put(schedule);
      }
    }
  }
}
