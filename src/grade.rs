//! Letter grades for evolutionary lines

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dex::Pokedex;

/// Evolution chains deeper than this are treated as malformed data
pub const MAX_EVOLUTION_DEPTH: usize = 10;

/// Grade categories, declared weakest first so `Ord` reads S > A > B > C > D
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Grade {
    D,
    C,
    B,
    A,
    S,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::S, Grade::A, Grade::B, Grade::C, Grade::D];

    /// Inclusive lower bounds, checked highest first
    pub fn from_score(score: u32) -> Self {
        match score {
            520.. => Grade::S,
            495.. => Grade::A,
            445.. => Grade::B,
            390.. => Grade::C,
            _ => Grade::D,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    pub fn card_class(self) -> &'static str {
        match self {
            Grade::S => "card-s",
            Grade::A => "card-a",
            Grade::B => "card-b",
            Grade::C => "card-c",
            Grade::D => "card-d",
        }
    }

    pub fn stamp_class(self) -> &'static str {
        match self {
            Grade::S => "stamp-s",
            Grade::A => "stamp-a",
            Grade::B => "stamp-b",
            Grade::C => "stamp-c",
            Grade::D => "stamp-d",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.letter())
    }
}

/// Grades species against a [`Pokedex`], memoising line scores by species key.
///
/// A line is graded by its strongest end form, so a base form inherits the
/// best score reachable through its evolutions.
#[derive(Debug, Default)]
pub struct Grader {
    memo: HashMap<String, LineScore>,
    /// Scores cut short by the depth cap, by depth; cleared per query
    cut: HashMap<(String, usize), u32>,
}

/// Exact score of a line and the number of evolution steps below it
#[derive(Clone, Copy, Debug)]
struct LineScore {
    score: u32,
    height: usize,
}

impl Grader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stat total of the species; 0 when it is not in the index
    pub fn score(&self, dex: &Pokedex, name: &str) -> u32 {
        dex.get(name)
            .map(|species| species.base_stats.total())
            .unwrap_or(0)
    }

    /// Score of the strongest end form reachable from `name`
    pub fn line_score(&mut self, dex: &Pokedex, name: &str) -> u32 {
        self.cut.clear();
        self.line_score_at(dex, name, 0).0
    }

    pub fn grade(&mut self, dex: &Pokedex, name: &str) -> Grade {
        Grade::from_score(self.line_score(dex, name))
    }

    pub fn memoized(&self) -> usize {
        self.memo.len()
    }

    /// Returns the score and the height of the line below `name`, or `None`
    /// for the height when the depth cap cut the walk short. Memoised scores
    /// are reused only where the whole line fits under the cap, so a score
    /// never depends on which species was graded first.
    fn line_score_at(
        &mut self,
        dex: &Pokedex,
        name: &str,
        depth: usize,
    ) -> (u32, Option<usize>) {
        if depth > MAX_EVOLUTION_DEPTH {
            return (0, None);
        }
        if let Some(line) = self.memo.get(name) {
            if depth + line.height <= MAX_EVOLUTION_DEPTH {
                return (line.score, Some(line.height));
            }
        }
        let at_depth = (name.to_string(), depth);
        if let Some(score) = self.cut.get(&at_depth) {
            return (*score, None);
        }
        let Some(species) = dex.get(name) else {
            return (0, Some(0));
        };

        let (score, height) = if species.evolutions().is_empty() {
            (species.base_stats.total(), Some(0))
        } else {
            let targets: Vec<String> = species
                .evolutions()
                .iter()
                .map(|evo| evo.to_lowercase())
                .collect();
            targets
                .iter()
                .map(|target| self.line_score_at(dex, target, depth + 1))
                .fold((0, Some(0)), |(best, height), (score, below)| {
                    let height = height.zip(below).map(|(h, b)| h.max(b + 1));
                    (best.max(score), height)
                })
        };

        match height {
            Some(height) => {
                self.memo.insert(name.to_string(), LineScore { score, height });
            }
            None => {
                self.cut.insert(at_depth, score);
            }
        }
        (score, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::{BaseStats, RawDataset, SpeciesRecord};

    fn species(num: i32, name: &str, total: u32, evos: &[&str]) -> SpeciesRecord {
        // Spread the total over six stats; only the sum matters here
        let share = total / 6;
        SpeciesRecord {
            num,
            name: name.to_string(),
            base_stats: BaseStats {
                hp: total - share * 5,
                atk: share,
                def: share,
                spa: share,
                spd: share,
                spe: share,
            },
            types: vec!["Normal".into()],
            forme: None,
            evos: if evos.is_empty() {
                None
            } else {
                Some(evos.iter().map(|evo| evo.to_string()).collect())
            },
        }
    }

    fn dex(records: Vec<SpeciesRecord>) -> Pokedex {
        let raw: RawDataset = records
            .into_iter()
            .map(|record| (record.name.to_lowercase(), record))
            .collect();
        Pokedex::build(&raw, 0)
    }

    #[test]
    fn test_threshold_boundaries() {
        let cases = [
            (600, Grade::S),
            (520, Grade::S),
            (519, Grade::A),
            (495, Grade::A),
            (494, Grade::B),
            (445, Grade::B),
            (444, Grade::C),
            (390, Grade::C),
            (389, Grade::D),
            (0, Grade::D),
        ];
        for (score, grade) in cases {
            assert_eq!(Grade::from_score(score), grade, "score {score}");
        }
    }

    #[test]
    fn test_from_score_is_monotonic() {
        let mut previous = Grade::from_score(0);
        for score in 1..=800 {
            let grade = Grade::from_score(score);
            assert!(grade >= previous, "{score} dropped from {previous} to {grade}");
            previous = grade;
        }
    }

    #[test]
    fn test_end_form_uses_own_stats() {
        let dex = dex(vec![species(132, "Ditto", 288, &[])]);
        let mut grader = Grader::new();

        assert_eq!(grader.line_score(&dex, "ditto"), 288);
        assert_eq!(grader.grade(&dex, "ditto"), Grade::D);
    }

    #[test]
    fn test_line_is_graded_by_strongest_endpoint() {
        let dex = dex(vec![
            species(133, "Eevee", 325, &["Vaporeon", "Espeon"]),
            species(134, "Vaporeon", 525, &[]),
            species(196, "Espeon", 500, &[]),
        ]);
        let mut grader = Grader::new();

        assert_eq!(grader.line_score(&dex, "eevee"), 525);
        assert_eq!(grader.grade(&dex, "eevee"), Grade::S);
        assert_eq!(grader.grade(&dex, "espeon"), Grade::A);
    }

    #[test]
    fn test_absent_species_scores_zero() {
        let dex = dex(vec![species(439, "Bonsly", 290, &["Sudowoodo"])]);
        let mut grader = Grader::new();

        assert_eq!(grader.score(&dex, "missing"), 0);
        assert_eq!(grader.line_score(&dex, "missing"), 0);
        // Evolution target outside the index contributes 0
        assert_eq!(grader.line_score(&dex, "bonsly"), 0);
    }

    #[test]
    fn test_cycle_fails_closed() {
        let dex = dex(vec![
            species(1, "Ouroboros", 500, &["Serpent"]),
            species(2, "Serpent", 510, &["Ouroboros"]),
        ]);
        let mut grader = Grader::new();

        assert_eq!(grader.line_score(&dex, "ouroboros"), 0);
        assert_eq!(grader.memoized(), 0);
    }

    #[test]
    fn test_dense_cycle_stays_cheap() {
        // Every species evolves into every species, itself included
        let names: Vec<String> = (0..12).map(|i| format!("Loop{i}")).collect();
        let all: Vec<&str> = names.iter().map(String::as_str).collect();
        let records = names
            .iter()
            .enumerate()
            .map(|(i, name)| species(i as i32 + 1, name, 500, &all))
            .collect();
        let dex = dex(records);
        let mut grader = Grader::new();

        for name in &names {
            assert_eq!(grader.line_score(&dex, &name.to_lowercase()), 0);
        }
        assert_eq!(grader.memoized(), 0);
    }

    #[test]
    fn test_long_chain_answers_do_not_depend_on_order() {
        // Branching chain deeper than the cap: level i splits into two forms
        // that both evolve into level i + 1
        let mut records = Vec::new();
        for level in 0..14 {
            let next = [format!("Up{}", level + 1), format!("Side{}", level + 1)];
            let evos: Vec<&str> = if level < 13 {
                next.iter().map(String::as_str).collect()
            } else {
                Vec::new()
            };
            let total = 300 + level as u32 * 10;
            records.push(species(level * 2 + 1, &format!("Up{level}"), total, &evos));
            records.push(species(level * 2 + 2, &format!("Side{level}"), total, &evos));
        }
        let dex = dex(records);

        let mut deep_first = Grader::new();
        let from_middle = deep_first.line_score(&dex, "up5");
        let from_top = deep_first.line_score(&dex, "up0");

        let mut top_first = Grader::new();
        assert_eq!(top_first.line_score(&dex, "up0"), from_top);
        assert_eq!(top_first.line_score(&dex, "up5"), from_middle);
        assert_eq!(from_middle, 430);
        assert_eq!(from_top, 0);
    }

    #[test]
    fn test_memo_matches_fresh_grader() {
        let dex = dex(vec![
            species(1, "Bulbasaur", 318, &["Ivysaur"]),
            species(2, "Ivysaur", 405, &["Venusaur"]),
            species(3, "Venusaur", 525, &[]),
        ]);
        let mut warm = Grader::new();
        warm.line_score(&dex, "venusaur");
        warm.line_score(&dex, "ivysaur");

        let mut cold = Grader::new();
        assert_eq!(
            warm.line_score(&dex, "bulbasaur"),
            cold.line_score(&dex, "bulbasaur")
        );
        assert_eq!(warm.memoized(), 3);
    }

    #[test]
    fn test_classes_follow_letter() {
        assert_eq!(Grade::S.card_class(), "card-s");
        assert_eq!(Grade::D.stamp_class(), "stamp-d");
        assert_eq!(Grade::B.to_string(), "B");
    }
}
