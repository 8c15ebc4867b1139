//! Question and option generation.
//!
//! Pure functions of the muscle pool, the session config, and an injected
//! random source, so tests can run them against a seeded [`rand::rngs::StdRng`].

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use crate::config::{self, QuizConfig};
use crate::db::filter_by_category;
use crate::domain::{AttributeKind, Muscle, MuscleCategory, Question, Quiz};

/// Build the four answer choices for one question: the target's attribute
/// value plus up to three distinct, non-empty values drawn from the pool.
///
/// Draws are bounded by [`config::DISTRACTOR_RETRY_BUDGET`] so a small or
/// homogeneous pool cannot loop forever; any slots still missing are filled
/// with placeholder labels distinct from the real options. The result is
/// always exactly four entries, uniformly shuffled so the correct answer's
/// position carries no information.
pub fn generate_options(
    target: &Muscle,
    kind: AttributeKind,
    pool: &[Muscle],
    rng: &mut impl Rng,
) -> Vec<String> {
    let correct = kind.value_of(target).to_string();
    let mut options = vec![correct];

    let mut attempts = 0;
    while !pool.is_empty()
        && options.len() < config::OPTION_COUNT
        && attempts < config::DISTRACTOR_RETRY_BUDGET
    {
        let candidate = kind.value_of(&pool[rng.random_range(0..pool.len())]);
        if !candidate.trim().is_empty() && !options.iter().any(|o| o == candidate) {
            options.push(candidate.to_string());
        }
        attempts += 1;
    }

    // Budget exhausted: pad with synthetic labels, skipping any that happen
    // to collide with a real option.
    let mut n = options.len();
    while options.len() < config::OPTION_COUNT {
        let label = format!("Option {}", n);
        if !options.contains(&label) {
            options.push(label);
        }
        n += 1;
    }

    options.shuffle(rng);
    options
}

/// Generate a full quiz for the given category filter.
///
/// Muscles are sampled without short-term replacement: a used-id set rejects
/// repeats until every muscle in the filtered pool has appeared, then resets
/// so a full cycle completes before any repeat. The per-slot retry loop is
/// capped at [`config::MUSCLE_RETRY_BUDGET`] draws and falls back to the last
/// draw rather than stalling the session.
///
/// Distractors deliberately come from the FULL pool, not the category subset,
/// so narrow categories still get plausible wrong answers.
///
/// An empty pool or kind set yields a zero-question quiz, which the session
/// treats as immediately complete.
pub fn generate_quiz(
    pool: &[Muscle],
    category: Option<MuscleCategory>,
    config: &QuizConfig,
    rng: &mut impl Rng,
) -> Quiz {
    let filtered = filter_by_category(pool, category);
    let kinds = config.effective_kinds();

    if filtered.is_empty() || kinds.is_empty() {
        return Quiz::new(category, Vec::new());
    }

    let mut used: HashSet<i64> = HashSet::new();
    let mut questions = Vec::with_capacity(config.question_count);

    for _ in 0..config.question_count {
        let mut selected: Option<&Muscle> = None;
        let mut last_drawn: Option<&Muscle> = None;

        let mut attempts = 0;
        while attempts < config::MUSCLE_RETRY_BUDGET && selected.is_none() {
            let candidate = &filtered[rng.random_range(0..filtered.len())];
            last_drawn = Some(candidate);

            if !used.contains(&candidate.id) {
                used.insert(candidate.id);
                selected = Some(candidate);
            } else if used.len() >= filtered.len() {
                // Every muscle has been used this pass; start a fresh pass
                // with the current draw.
                used.clear();
                used.insert(candidate.id);
                selected = Some(candidate);
            }
            attempts += 1;
        }

        // Budget exhausted without an unused draw; accept the last one.
        let Some(muscle) = selected.or(last_drawn) else {
            continue;
        };

        let kind = kinds[rng.random_range(0..kinds.len())];
        let options = generate_options(muscle, kind, pool, rng);
        questions.push(Question::new(muscle, kind, options));
    }

    Quiz::new(category, questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MuscleSubcategory;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn muscle(id: i64, name: &str, category: MuscleCategory) -> Muscle {
        Muscle {
            id,
            name: name.to_string(),
            origin: format!("origine {}", name),
            insertion: format!("terminaison {}", name),
            innervation: format!("innervation {}", name),
            vascularization: format!("vascularisation {}", name),
            category,
            subcategory: MuscleSubcategory::Back,
        }
    }

    fn pool(n: i64) -> Vec<Muscle> {
        (0..n)
            .map(|i| muscle(i, &format!("muscle{}", i), MuscleCategory::Trunk))
            .collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_options_shape() {
        let pool = pool(10);
        let mut rng = rng();
        for seed_target in &pool {
            let options =
                generate_options(seed_target, AttributeKind::Origin, &pool, &mut rng);
            assert_eq!(options.len(), 4);

            let correct = &seed_target.origin;
            assert_eq!(options.iter().filter(|o| *o == correct).count(), 1);

            // Pairwise distinct
            let mut deduped = options.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), 4);
        }
    }

    #[test]
    fn test_options_pad_with_placeholders_on_tiny_pool() {
        let pool = pool(1);
        let mut rng = rng();
        let options = generate_options(&pool[0], AttributeKind::Origin, &pool, &mut rng);
        assert_eq!(options.len(), 4);
        assert!(options.contains(&"origine muscle0".to_string()));
        assert_eq!(options.iter().filter(|o| o.starts_with("Option ")).count(), 3);
    }

    #[test]
    fn test_options_on_empty_pool_are_all_placeholders() {
        let target = muscle(1, "biceps", MuscleCategory::UpperLimb);
        let mut rng = rng();
        let options = generate_options(&target, AttributeKind::Origin, &[], &mut rng);
        assert_eq!(options.len(), 4);
        assert!(options.contains(&target.origin));
        assert_eq!(options.iter().filter(|o| o.starts_with("Option ")).count(), 3);
    }

    #[test]
    fn test_options_skip_empty_values() {
        let mut pool = pool(6);
        for m in pool.iter_mut().skip(1) {
            m.origin = "   ".to_string();
        }
        let mut rng = rng();
        let options = generate_options(&pool[0], AttributeKind::Origin, &pool, &mut rng);
        assert_eq!(options.len(), 4);
        assert!(!options.iter().any(|o| o.trim().is_empty()));
    }

    #[test]
    fn test_quiz_has_requested_count() {
        let pool = pool(8);
        let config = QuizConfig {
            question_count: 5,
            ..QuizConfig::default()
        };
        let quiz = generate_quiz(&pool, None, &config, &mut rng());
        assert_eq!(quiz.questions.len(), 5);
        assert_eq!(quiz.total_questions, 5);
        assert_eq!(quiz.score, 0);
    }

    #[test]
    fn test_no_repetition_within_pool_size() {
        // With question_count <= pool size, every question targets a
        // different muscle.
        let pool = pool(12);
        let config = QuizConfig {
            question_count: 12,
            ..QuizConfig::default()
        };
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let quiz = generate_quiz(&pool, None, &config, &mut rng);
            let ids: HashSet<i64> = quiz.questions.iter().map(|q| q.muscle_id).collect();
            assert_eq!(ids.len(), 12, "seed {} repeated a muscle", seed);
        }
    }

    #[test]
    fn test_longer_quiz_than_pool_still_fills() {
        let pool = pool(3);
        let config = QuizConfig {
            question_count: 10,
            ..QuizConfig::default()
        };
        let quiz = generate_quiz(&pool, None, &config, &mut rng());
        assert_eq!(quiz.questions.len(), 10);
    }

    #[test]
    fn test_empty_pool_yields_empty_quiz() {
        let quiz = generate_quiz(&[], None, &QuizConfig::default(), &mut rng());
        assert_eq!(quiz.questions.len(), 0);
        assert_eq!(quiz.total_questions, 0);
        assert_eq!(quiz.percentage(), 0.0);
    }

    #[test]
    fn test_kinds_restricted_to_config() {
        let pool = pool(6);
        let config = QuizConfig {
            question_count: 20,
            enabled_kinds: vec![AttributeKind::Innervation],
            ..QuizConfig::default()
        };
        let quiz = generate_quiz(&pool, None, &config, &mut rng());
        assert!(quiz.questions.iter().all(|q| q.kind == AttributeKind::Innervation));
    }

    #[test]
    fn test_empty_kind_set_falls_back_to_origin() {
        let pool = pool(6);
        let config = QuizConfig {
            question_count: 4,
            enabled_kinds: vec![],
            ..QuizConfig::default()
        };
        let quiz = generate_quiz(&pool, None, &config, &mut rng());
        assert_eq!(quiz.questions.len(), 4);
        assert!(quiz.questions.iter().all(|q| q.kind == AttributeKind::Origin));
    }

    #[test]
    fn test_category_filter_limits_targets_not_distractors() {
        let mut all = pool(4);
        all.push(muscle(100, "biceps", MuscleCategory::UpperLimb));
        all.push(muscle(101, "triceps", MuscleCategory::UpperLimb));

        let config = QuizConfig {
            question_count: 6,
            ..QuizConfig::default()
        };
        let quiz = generate_quiz(&all, Some(MuscleCategory::UpperLimb), &config, &mut rng());
        assert_eq!(quiz.category, Some(MuscleCategory::UpperLimb));
        assert!(
            quiz.questions.iter().all(|q| q.muscle_id == 100 || q.muscle_id == 101),
            "targets must come from the filtered category"
        );
    }

    #[test]
    fn test_question_text_matches_kind_and_muscle() {
        let pool = pool(5);
        let config = QuizConfig {
            question_count: 5,
            ..QuizConfig::default()
        };
        let quiz = generate_quiz(&pool, None, &config, &mut rng());
        for q in &quiz.questions {
            assert_eq!(q.question, q.kind.question_text(&q.muscle_name));
            assert!(q.options.contains(&q.correct_answer));
        }
    }
}
