/// Shortest walks over a room, for driving sessions step by step in tests.

use std::collections::{HashMap, VecDeque};

use crate::domain::entity::MoveDir;
use crate::domain::grid::Grid;
use crate::domain::rules;

/// Shortest walk between two cells (BFS), as single steps.
pub fn route(room: &Grid, from: (usize, usize), to: (usize, usize)) -> Option<Vec<MoveDir>> {
    let mut prev: HashMap<(usize, usize), ((usize, usize), MoveDir)> = HashMap::new();
    let mut queue = VecDeque::from([from]);
    while let Some(cur) = queue.pop_front() {
        if cur == to {
            let mut steps = vec![];
            let mut at = to;
            while at != from {
                let (p, d) = prev[&at];
                steps.push(d);
                at = p;
            }
            steps.reverse();
            return Some(steps);
        }
        for dir in [MoveDir::Up, MoveDir::Down, MoveDir::Left, MoveDir::Right] {
            if let Some(next) = rules::step_target(room, cur.0, cur.1, dir) {
                if next != from && !prev.contains_key(&next) {
                    prev.insert(next, (cur, dir));
                    queue.push_back(next);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level;

    #[test]
    fn route_avoids_furniture() {
        let room = level::embedded_room();
        let steps = route(&room, (5, 2), (5, 4)).unwrap();
        // (5, 3) is the "4" of "[T4]", so the walk goes around the label
        assert!(steps.len() > 2);
        assert_eq!(route(&room, (1, 4), (1, 4)), Some(vec![]));
        assert_eq!(route(&room, (1, 4), (0, 0)), None);
    }
}
