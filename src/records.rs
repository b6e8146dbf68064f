//! Record shapes: the static prize, the scheduled draw, and tickets minted on purchase.
//! Tickets live for the session only.

use chrono::NaiveDateTime;

/// The single prize on offer. The image is referenced by name and never loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prize {
    pub id: &'static str,
    pub name: &'static str,
    pub value: &'static str,
    pub image: &'static str,
}

pub const PRIZE: Prize = Prize {
    id: "1",
    name: "MICROWAVE JACKPOT",
    value: "Premium Microwave",
    image: "microwave-jackpot.png",
};

/// A scheduled draw. Nothing resolves draws, so `winning_numbers` stays empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub id: String,
    pub date: NaiveDateTime,
    pub winning_numbers: Vec<u8>,
}

impl Draw {
    pub fn scheduled(date: NaiveDateTime) -> Self {
        Self {
            id: format!("draw-{}", date.format("%Y%m%d-%H%M")),
            date,
            winning_numbers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: String,
    pub numbers: Vec<u8>,
    pub draw_id: String,
    pub purchase_date: NaiveDateTime,
}

impl Ticket {
    /// `serial` is 1-based within the session.
    pub fn new(serial: u32, numbers: &[u8], draw: &Draw, purchase_date: NaiveDateTime) -> Self {
        Self {
            id: format!("T-{serial:04}"),
            numbers: numbers.to_vec(),
            draw_id: draw.id.clone(),
            purchase_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_ticket_references_draw() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap();
        let bought = date - chrono::TimeDelta::hours(2);
        let draw = Draw::scheduled(date);
        assert_eq!(draw.id, "draw-20261019-1700");
        assert!(draw.winning_numbers.is_empty());
        let ticket = Ticket::new(3, &[4, 8, 15], &draw, bought);
        assert_eq!(ticket.id, "T-0003");
        assert_eq!(ticket.draw_id, draw.id);
        assert_eq!(ticket.numbers, vec![4, 8, 15]);
        assert_eq!(ticket.purchase_date, bought);
    }
}
