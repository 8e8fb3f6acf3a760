use log::debug;
use crate::models::{CourseEntry, EntryId, Grade, MAX_CREDITS, MIN_CREDITS};

pub const MAX_COURSES: usize = 12;
pub const MIN_COURSES: usize = 1;
pub const DEFAULT_COURSES: usize = 6;

/// Ordered list of course rows, always holding between one and twelve entries.
///
/// Display indices are positional, so removing a row renumbers everything
/// after it. Entry ids come from a counter that only `reset` rewinds.
#[derive(Debug, Clone)]
pub struct Roster {
    entries: Vec<CourseEntry>,
    next_id: u32,
}

impl Default for Roster {
    fn default() -> Self {
        Roster::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        let mut roster = Roster { entries: Vec::with_capacity(MAX_COURSES), next_id: 0 };
        roster.populate();
        roster
    }

    fn populate(&mut self) {
        for _ in 0..DEFAULT_COURSES {
            self.add();
        }
    }

    pub fn entries(&self) -> &[CourseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_add(&self) -> bool {
        self.entries.len() < MAX_COURSES
    }

    pub fn can_remove(&self) -> bool {
        self.entries.len() > MIN_COURSES
    }

    pub fn get(&self, id: EntryId) -> Option<&CourseEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// 1-based display index of an entry.
    pub fn display_index(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id).map(|i| i + 1)
    }

    /// Id of the entry shown at a 1-based display index.
    pub fn id_at(&self, index: usize) -> Option<EntryId> {
        index.checked_sub(1).and_then(|i| self.entries.get(i)).map(|e| e.id)
    }

    /// Appends a default row. Returns `None` without touching the roster when it is full.
    pub fn add(&mut self) -> Option<EntryId> {
        if !self.can_add() {
            debug!("Roster is full ({} courses), add ignored", MAX_COURSES);
            return None;
        }
        self.next_id += 1;
        let id = EntryId(self.next_id);
        self.entries.push(CourseEntry::new(id));
        Some(id)
    }

    /// Deletes a row. Returns `false` when it is the last one left or the id is unknown.
    pub fn remove(&mut self, id: EntryId) -> bool {
        if !self.can_remove() {
            debug!("Roster holds a single course, remove ignored");
            return false;
        }
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => {
                debug!("No course with id {:?}, remove ignored", id);
                false
            }
        }
    }

    pub fn set_credits(&mut self, id: EntryId, raw: &str) -> Option<u8> {
        let credits = parse_credits(raw);
        let entry = self.entry_mut(id)?;
        entry.credits = credits;
        Some(credits)
    }

    // Stepper buttons: one credit up or down, staying inside the range.
    pub fn step_credits(&mut self, id: EntryId, dir: i8) -> Option<u8> {
        let entry = self.entry_mut(id)?;
        entry.credits = clamp_credits(i64::from(entry.credits) + i64::from(dir));
        Some(entry.credits)
    }

    pub fn set_grade(&mut self, id: EntryId, grade: Grade) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.grade = grade;
                true
            }
            None => false,
        }
    }

    pub fn set_name(&mut self, id: EntryId, name: &str) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.name = name.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Drops every row and starts over with the default six, ids restarting at 1.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.next_id = 0;
        self.populate();
    }

    fn entry_mut(&mut self, id: EntryId) -> Option<&mut CourseEntry> {
        let entry = self.entries.iter_mut().find(|e| e.id == id);
        if entry.is_none() {
            debug!("No course with id {:?}", id);
        }
        entry
    }
}

/// Reads a credit field the way a number input is read: leading whitespace
/// skipped, optional sign, leading digits taken and the rest ignored.
/// Anything unparseable or negative becomes 0; the result is clamped to 0..=10.
pub fn parse_credits(raw: &str) -> u8 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &digits[..digits.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return MIN_CREDITS;
    }
    let magnitude = digits
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    clamp_credits(if negative { -magnitude } else { magnitude })
}

fn clamp_credits(value: i64) -> u8 {
    value.clamp(i64::from(MIN_CREDITS), i64::from(MAX_CREDITS)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_roster_has_six_default_rows() {
        let roster = Roster::new();
        assert_eq!(roster.len(), DEFAULT_COURSES);
        for (i, entry) in roster.entries().iter().enumerate() {
            assert_eq!(entry.id, EntryId(i as u32 + 1));
            assert_eq!(entry.credits, 0);
            assert_eq!(entry.grade, Grade::O);
            assert!(entry.name.is_empty());
        }
    }

    #[test]
    fn add_is_a_no_op_when_full() {
        let mut roster = Roster::new();
        while roster.can_add() {
            assert!(roster.add().is_some());
        }
        assert_eq!(roster.len(), MAX_COURSES);
        assert_eq!(roster.add(), None);
        assert_eq!(roster.len(), MAX_COURSES);
    }

    #[test]
    fn remove_is_a_no_op_on_last_row() {
        let mut roster = Roster::new();
        while roster.len() > 1 {
            let id = roster.entries()[0].id;
            assert!(roster.remove(id));
        }
        let last = roster.entries()[0].id;
        assert!(!roster.remove(last));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn remove_renumbers_following_rows() {
        let mut roster = Roster::new();
        let second = roster.id_at(2).unwrap();
        let third = roster.id_at(3).unwrap();
        assert!(roster.remove(second));
        assert_eq!(roster.display_index(third), Some(2));
        assert_eq!(roster.display_index(second), None);
        assert_eq!(roster.len(), DEFAULT_COURSES - 1);
    }

    #[test]
    fn remove_unknown_id_changes_nothing() {
        let mut roster = Roster::new();
        assert!(!roster.remove(EntryId(99)));
        assert_eq!(roster.len(), DEFAULT_COURSES);
    }

    #[test]
    fn ids_are_not_reused_after_remove() {
        let mut roster = Roster::new();
        let first = roster.id_at(1).unwrap();
        roster.remove(first);
        assert_eq!(roster.add(), Some(EntryId(7)));
    }

    #[test]
    fn reset_restores_defaults_and_ids() {
        let mut roster = Roster::new();
        let id = roster.id_at(1).unwrap();
        roster.set_credits(id, "4");
        roster.set_grade(id, Grade::B);
        roster.add();
        roster.add();
        roster.reset();
        assert_eq!(roster.len(), DEFAULT_COURSES);
        assert_eq!(roster.id_at(1), Some(EntryId(1)));
        assert!(roster.entries().iter().all(|e| e.credits == 0 && e.grade == Grade::O));
    }

    #[test]
    fn credit_input_is_clamped() {
        assert_eq!(parse_credits("-5"), 0);
        assert_eq!(parse_credits("15"), 10);
        assert_eq!(parse_credits("abc"), 0);
        assert_eq!(parse_credits(""), 0);
        assert_eq!(parse_credits("  4"), 4);
        assert_eq!(parse_credits("+3"), 3);
        assert_eq!(parse_credits("3.7"), 3);
        assert_eq!(parse_credits("7abc"), 7);
        assert_eq!(parse_credits("-"), 0);
        assert_eq!(parse_credits("99999999999999999999999"), 10);
    }

    #[test]
    fn set_credits_stores_clamped_value() {
        let mut roster = Roster::new();
        let id = roster.id_at(1).unwrap();
        assert_eq!(roster.set_credits(id, "15"), Some(10));
        assert_eq!(roster.get(id).unwrap().credits, 10);
        assert_eq!(roster.set_credits(EntryId(42), "3"), None);
    }

    #[test]
    fn stepper_stays_in_range() {
        let mut roster = Roster::new();
        let id = roster.id_at(1).unwrap();
        assert_eq!(roster.step_credits(id, -1), Some(0));
        roster.set_credits(id, "9");
        assert_eq!(roster.step_credits(id, 1), Some(10));
        assert_eq!(roster.step_credits(id, 1), Some(10));
        assert_eq!(roster.step_credits(id, -1), Some(9));
    }

    #[test]
    fn set_name_trims() {
        let mut roster = Roster::new();
        let id = roster.id_at(1).unwrap();
        assert!(roster.set_name(id, "  Mathematics "));
        assert_eq!(roster.get(id).unwrap().name, "Mathematics");
    }

    proptest! {
        #[test]
        fn length_stays_within_bounds(ops in proptest::collection::vec(any::<(bool, usize)>(), 0..64)) {
            let mut roster = Roster::new();
            for (add, pick) in ops {
                if add {
                    roster.add();
                } else {
                    let id = roster.entries()[pick % roster.len()].id;
                    roster.remove(id);
                }
                prop_assert!(roster.len() >= MIN_COURSES && roster.len() <= MAX_COURSES);
            }
        }

        #[test]
        fn parsed_credits_always_in_range(raw in ".*") {
            prop_assert!(parse_credits(&raw) <= MAX_CREDITS);
        }
    }
}
