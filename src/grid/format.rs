//! Ticket number labels.
//!
//! Labels are zero-padded to the digit count of the highest ticket number,
//! so a 100-ticket raffle shows `00`..`99` and a 1000-ticket raffle shows
//! `000`..`999`. Palindrome detection runs on the padded label.

/// Formats ticket numbers for one raffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketFormatter {
    width: usize,
}

impl TicketFormatter {
    pub fn new(ticket_count: usize) -> Self {
        Self {
            width: label_width(ticket_count),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn format(&self, number: usize) -> String {
        format!("{:0width$}", number, width = self.width)
    }

    pub fn is_palindrome(&self, number: usize) -> bool {
        is_palindrome(&self.format(number))
    }
}

/// Digit count of the highest ticket number (`ticket_count - 1`).
pub fn label_width(ticket_count: usize) -> usize {
    digit_count(ticket_count.saturating_sub(1))
}

fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Zero-padded label for `number` in a raffle of `ticket_count` tickets.
pub fn format_ticket_number(number: usize, ticket_count: usize) -> String {
    TicketFormatter::new(ticket_count).format(number)
}

/// True when the label reads the same in both directions.
pub fn is_palindrome(label: &str) -> bool {
    label.chars().eq(label.chars().rev())
}
