//! Reserve valuation and the matching algorithms shared by execution and preview.
//!
//! Everything here is a pure function of a reserve snapshot. The perpetual tranche
//! pallet executes the plans these functions return, and the router returns the very
//! same plans as previews, so both paths agree by construction.

use crate::{
  assets::AssetId,
  ecosystem::{
    params::{PRICE_UNIT, YIELD_UNIT},
    Balance,
  },
  math::{mul_div_ceil, mul_div_floor},
  strategies::FeeQuote,
};
use alloc::vec::Vec;
use codec::{Decode, Encode};
use scale_info::TypeInfo;

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

/// Yield and price of one token, both fixed-point.
#[derive(Clone, Copy, Debug, Decode, Default, Encode, Eq, PartialEq, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct Valuation {
  pub yield_factor: Balance,
  pub price: Balance,
}

impl Valuation {
  pub fn new(yield_factor: Balance, price: Balance) -> Self {
    Self { yield_factor, price }
  }

  pub fn is_zero(&self) -> bool {
    self.yield_factor == 0 || self.price == 0
  }

  /// Perp backed by `amount` units, ignoring price.
  pub fn backing(&self, amount: Balance) -> Balance {
    mul_div_floor(amount, self.yield_factor, YIELD_UNIT)
  }

  /// Units needed to back `perp_amount`, ignoring price.
  pub fn units_for_backing(&self, perp_amount: Balance) -> Balance {
    mul_div_floor(perp_amount, YIELD_UNIT, self.yield_factor)
  }

  /// Perp value of `amount` units, weighted by yield and price.
  pub fn value(&self, amount: Balance) -> Balance {
    mul_div_floor(amount, self.weight(), YIELD_UNIT.saturating_mul(PRICE_UNIT))
  }

  /// Units worth `perp_amount`, weighted by yield and price.
  pub fn units_for_value(&self, perp_amount: Balance) -> Balance {
    mul_div_floor(perp_amount, YIELD_UNIT.saturating_mul(PRICE_UNIT), self.weight())
  }

  /// Fewest units worth at least `perp_amount`.
  pub fn units_for_value_ceil(&self, perp_amount: Balance) -> Balance {
    mul_div_ceil(perp_amount, YIELD_UNIT.saturating_mul(PRICE_UNIT), self.weight())
  }

  fn weight(&self) -> Balance {
    self.yield_factor.saturating_mul(self.price)
  }
}

/// One ledger entry as seen at the start of an operation.
#[derive(Clone, Copy, Debug, Decode, Default, Encode, Eq, PartialEq, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct ReserveEntry {
  pub asset: AssetId,
  pub balance: Balance,
  pub valuation: Valuation,
}

impl ReserveEntry {
  pub fn backing(&self) -> Balance {
    self.valuation.backing(self.balance)
  }

  pub fn value(&self) -> Balance {
    self.valuation.value(self.balance)
  }
}

/// Sum of price-weighted values over a snapshot.
pub fn reserve_value(reserve: &[ReserveEntry]) -> Balance {
  reserve.iter().fold(0, |acc: Balance, e| acc.saturating_add(e.value()))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedemptionError {
  /// Value is still owed after walking the whole ledger with no cap.
  InsufficientReserve,
}

/// Outcome of a FIFO walk over the ledger.
#[derive(Clone, Debug, Decode, Default, Encode, Eq, PartialEq, TypeInfo)]
pub struct RedemptionPlan {
  /// Perp value the walk was asked to cover.
  pub requested: Balance,
  /// Perp value actually covered by `tokens`.
  pub covered: Balance,
  /// Tokens released, in ledger order, padded with `None` up to the cap.
  pub tokens: Vec<Option<(AssetId, Balance)>>,
}

impl RedemptionPlan {
  pub fn remainder(&self) -> Balance {
    self.requested.saturating_sub(self.covered)
  }

  pub fn touched(&self) -> impl Iterator<Item = &(AssetId, Balance)> {
    self.tokens.iter().flatten()
  }
}

/// Walks `reserve` in order, taking tokens until `value` is covered.
///
/// Each token contributes at most its whole backing; only the last touched token may be
/// taken partially, rounded down. A remainder worth less than one unit of the next token
/// is dust: it counts as covered and ends the walk. Entries without backing are skipped
/// and do not count toward `max_tokens`. Running out of ledger is an error only when no
/// cap is given.
pub fn plan_redemption(
  reserve: &[ReserveEntry],
  value: Balance,
  max_tokens: Option<u32>,
) -> Result<RedemptionPlan, RedemptionError> {
  let slots = match max_tokens {
    Some(cap) => reserve.len().min(cap as usize),
    None => reserve.len(),
  };
  let mut tokens = Vec::with_capacity(slots);
  let mut owed = value;

  for entry in reserve {
    if owed == 0 || tokens.len() >= slots {
      break;
    }
    let available = entry.backing();
    if available == 0 {
      continue;
    }
    let take = if available <= owed {
      owed -= available;
      entry.balance
    } else {
      let take = entry.valuation.units_for_backing(owed);
      owed = 0;
      if take == 0 {
        break;
      }
      take
    };
    tokens.push(Some((entry.asset, take)));
  }

  if max_tokens.is_none() && owed > 0 {
    return Err(RedemptionError::InsufficientReserve);
  }
  tokens.resize(slots, None);
  Ok(RedemptionPlan { requested: value, covered: value - owed, tokens })
}

/// Amounts of a single rollover.
#[derive(Clone, Copy, Debug, Decode, Default, Encode, Eq, PartialEq, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct RolloverQuote {
  pub tranche_in_amount: Balance,
  pub token_out_amount: Balance,
  pub perp_rollover_amount: Balance,
  pub remaining_tranche_in_amount: Balance,
  pub remaining_token_out_amount: Balance,
}

impl RolloverQuote {
  fn nothing(tranche_in_available: Balance, token_out_requested: Balance) -> Self {
    Self {
      remaining_tranche_in_amount: tranche_in_available,
      remaining_token_out_amount: token_out_requested,
      ..Default::default()
    }
  }

  pub fn is_zero(&self) -> bool {
    self.perp_rollover_amount == 0
  }
}

/// Value-equivalent exchange of `tranche_in` for `token_out`.
///
/// The requested output is clamped to what the reserve holds. When the whole incoming
/// amount would buy more than that, the output is capped and the incoming amount is
/// recomputed from the capped value, rounded up so the reserve never gives value away. Degenerate valuations and trades that would round
/// either side to zero produce an all-zero quote.
pub fn quote_rollover(
  tranche_in: Valuation,
  token_out: Valuation,
  tranche_in_available: Balance,
  token_out_requested: Balance,
  token_out_balance: Balance,
) -> RolloverQuote {
  let token_out_requested = token_out_requested.min(token_out_balance);
  let nothing = RolloverQuote::nothing(tranche_in_available, token_out_requested);
  if tranche_in.is_zero() || token_out.is_zero() {
    return nothing;
  }

  let mut tranche_in_amount = tranche_in_available;
  let mut perp_rollover_amount = tranche_in.value(tranche_in_amount);
  let mut token_out_amount = token_out.units_for_value(perp_rollover_amount);
  if token_out_amount > token_out_requested {
    token_out_amount = token_out_requested;
    perp_rollover_amount = token_out.value(token_out_amount);
    tranche_in_amount = tranche_in.units_for_value_ceil(perp_rollover_amount).min(tranche_in_available);
  }

  if perp_rollover_amount == 0 || tranche_in_amount == 0 || token_out_amount == 0 {
    return nothing;
  }
  RolloverQuote {
    tranche_in_amount,
    token_out_amount,
    perp_rollover_amount,
    remaining_tranche_in_amount: tranche_in_available - tranche_in_amount,
    remaining_token_out_amount: token_out_requested - token_out_amount,
  }
}

/// Incoming tranche offered to the reserve.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RolloverCandidate {
  pub asset: AssetId,
  pub amount: Balance,
  pub valuation: Valuation,
}

#[derive(Clone, Copy, Debug, Decode, Encode, Eq, PartialEq, TypeInfo)]
pub struct RolloverTrade {
  pub tranche_in: AssetId,
  pub token_out: AssetId,
  pub quote: RolloverQuote,
}

/// Greedy two-pointer match of incoming tranches against outgoing reserve tokens.
///
/// `i` walks `incoming`, `j` walks `outgoing`. A zero notional moves `i` alone; otherwise
/// each side moves once its remainder is exhausted. Produces at most
/// `incoming.len() + outgoing.len() - 1` trades.
pub fn plan_rollovers(incoming: &[RolloverCandidate], outgoing: &[ReserveEntry]) -> Vec<RolloverTrade> {
  let mut remaining_in: Vec<Balance> = incoming.iter().map(|c| c.amount).collect();
  let mut remaining_out: Vec<Balance> = outgoing.iter().map(|e| e.balance).collect();
  let mut trades = Vec::new();
  let (mut i, mut j) = (0, 0);

  while i < incoming.len() && j < outgoing.len() {
    let quote = quote_rollover(
      incoming[i].valuation,
      outgoing[j].valuation,
      remaining_in[i],
      remaining_out[j],
      remaining_out[j],
    );
    if quote.is_zero() {
      i += 1;
      continue;
    }
    trades.push(RolloverTrade { tranche_in: incoming[i].asset, token_out: outgoing[j].asset, quote });
    remaining_in[i] = quote.remaining_tranche_in_amount;
    remaining_out[j] = quote.remaining_token_out_amount;
    if remaining_in[i] == 0 {
      i += 1;
    }
    if remaining_out[j] == 0 {
      j += 1;
    }
  }
  trades
}

/// Result of a deposit.
#[derive(Clone, Copy, Debug, Decode, Default, Encode, Eq, PartialEq, TypeInfo)]
pub struct MintQuote {
  pub tranche: AssetId,
  pub tranche_amount: Balance,
  /// Perp backed by the deposit before fees.
  pub perp_amount: Balance,
  /// Perp received by the depositor.
  pub mint_amount: Balance,
  pub fee: FeeQuote,
}

/// Result of a burn.
#[derive(Clone, Debug, Decode, Default, Encode, Eq, PartialEq, TypeInfo)]
pub struct RedemptionQuote {
  /// Perp debited from the redeemer, fee included when it is charged in perp.
  pub burn_amount: Balance,
  pub redeemed_value: Balance,
  pub fee: FeeQuote,
  pub tokens: Vec<Option<(AssetId, Balance)>>,
}

/// Result of a rollover.
#[derive(Clone, Copy, Debug, Decode, Default, Encode, Eq, PartialEq, TypeInfo)]
pub struct RolloverOutcome {
  pub quote: RolloverQuote,
  pub fee: FeeQuote,
}
