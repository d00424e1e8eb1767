use crate::model::seat::Seat;

/// Points taken per seat during the current deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: [u32; 4],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 4] }
    }

    pub fn add_points(&mut self, seat: Seat, points: u32) {
        self.totals[seat.index()] += points;
    }

    pub fn score(&self, seat: Seat) -> u32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[u32; 4] {
        &self.totals
    }

    pub fn total(&self) -> u32 {
        self.totals.iter().sum()
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::ScoreBoard;
    use crate::model::seat::Seat;

    #[test]
    fn scoreboard_tracks_points_per_seat() {
        let mut board = ScoreBoard::new();
        board.add_points(Seat::East, 13);
        board.add_points(Seat::East, 2);
        assert_eq!(board.score(Seat::East), 15);
        assert_eq!(board.score(Seat::South), 0);
        assert_eq!(board.total(), 15);
    }
}
