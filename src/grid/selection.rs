//! Tentative ticket selection.

use crate::types::Raffle;

/// Result of clicking a ticket cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    RaffleNotActive,
    OutOfRange,
    AlreadySold,
}

/// Ordered, duplicate-free set of selected ticket numbers.
///
/// Numbers keep the order in which they were first selected; purchases are
/// submitted in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    numbers: Vec<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `number`, refusing sold tickets and inactive raffles.
    pub fn toggle(&mut self, raffle: &Raffle, number: usize) -> ToggleOutcome {
        if !raffle.status.accepts_purchases() {
            return ToggleOutcome::Rejected(RejectReason::RaffleNotActive);
        }
        if number >= raffle.ticket_count() {
            return ToggleOutcome::Rejected(RejectReason::OutOfRange);
        }
        if raffle.is_sold(number) {
            return ToggleOutcome::Rejected(RejectReason::AlreadySold);
        }

        if let Some(pos) = self.numbers.iter().position(|n| *n == number) {
            self.numbers.remove(pos);
            ToggleOutcome::Deselected
        } else {
            self.numbers.push(number);
            ToggleOutcome::Selected
        }
    }

    pub fn clear(&mut self) {
        self.numbers.clear();
    }

    pub fn contains(&self, number: usize) -> bool {
        self.numbers.contains(&number)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Selected numbers in selection order
    pub fn numbers(&self) -> &[usize] {
        &self.numbers
    }

    /// Price of the whole selection
    pub fn total(&self, ticket_price: f64) -> f64 {
        self.numbers.len() as f64 * ticket_price
    }

    /// Drop numbers that are sold or no longer exist in `raffle`.
    ///
    /// Returns the dropped numbers.
    pub fn retain_available(&mut self, raffle: &Raffle) -> Vec<usize> {
        let mut dropped = Vec::new();
        self.numbers.retain(|n| {
            let keep = *n < raffle.ticket_count() && !raffle.is_sold(*n);
            if !keep {
                dropped.push(*n);
            }
            keep
        });
        dropped
    }
}
