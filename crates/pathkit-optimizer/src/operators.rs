//! Selection, crossover, and mutation over flat coordinate genomes.

use rand::Rng;
use rand_distr::StandardNormal;

use pathkit_core::constants::FIELD_SIZE;

/// A scored genome.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub genome: Vec<f64>,
    /// Penalized time; lower is better.
    pub fitness: f64,
    pub total_time: f64,
    pub collision_penalty: f64,
}

/// Sort best first.
pub fn rank(population: &mut [Candidate]) {
    population.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
}

/// Best of `size` candidates drawn uniformly with replacement.
pub fn tournament<'p, R: Rng>(population: &'p [Candidate], size: usize, rng: &mut R) -> &'p Candidate {
    let mut best = &population[rng.gen_range(0..population.len())];
    for _ in 1..size.max(1) {
        let challenger = &population[rng.gen_range(0..population.len())];
        if challenger.fitness < best.fitness {
            best = challenger;
        }
    }
    best
}

/// Arithmetic blend: each coordinate lands uniformly between the parents'.
pub fn blend<R: Rng>(a: &[f64], b: &[f64], rng: &mut R) -> Vec<f64> {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let w: f64 = rng.gen();
            x + (y - x) * w
        })
        .collect()
}

/// Nudge each coordinate with probability `rate` by `N(0, sigma)`, then
/// clamp everything to the field.
pub fn mutate<R: Rng>(genome: &mut [f64], sigma: f64, rate: f64, rng: &mut R) {
    for value in genome.iter_mut() {
        if rng.gen_bool(rate.clamp(0.0, 1.0)) {
            let n: f64 = rng.sample(StandardNormal);
            *value += n * sigma;
        }
        *value = value.clamp(0.0, FIELD_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn candidate(fitness: f64) -> Candidate {
        Candidate {
            genome: vec![fitness],
            fitness,
            total_time: fitness,
            collision_penalty: 0.0,
        }
    }

    #[test]
    fn test_rank_best_first() {
        let mut population = vec![candidate(3.0), candidate(1.0), candidate(2.0)];
        rank(&mut population);
        let order: Vec<f64> = population.iter().map(|c| c.fitness).collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_tournament_never_picks_worse_than_a_draw() {
        let mut rng = SmallRng::seed_from_u64(7);
        let population = vec![candidate(1.0), candidate(5.0)];
        // with a huge tournament the best is all but certain
        for _ in 0..20 {
            assert_eq!(tournament(&population, 64, &mut rng).fitness, 1.0);
        }
    }

    #[test]
    fn test_blend_stays_between_parents() {
        let mut rng = SmallRng::seed_from_u64(1);
        let a = vec![0.0, 10.0, 50.0];
        let b = vec![10.0, 0.0, 50.0];
        for _ in 0..50 {
            let child = blend(&a, &b, &mut rng);
            assert!((0.0..=10.0).contains(&child[0]));
            assert!((0.0..=10.0).contains(&child[1]));
            assert_eq!(child[2], 50.0);
        }
    }

    #[test]
    fn test_mutation_clamps_to_field() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut genome = vec![0.0, FIELD_SIZE, 72.0];
        for _ in 0..100 {
            mutate(&mut genome, 500.0, 1.0, &mut rng);
            assert!(genome.iter().all(|v| (0.0..=FIELD_SIZE).contains(v)));
        }
    }

    #[test]
    fn test_zero_rate_leaves_genome() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut genome = vec![1.0, 2.0, 3.0];
        mutate(&mut genome, 10.0, 0.0, &mut rng);
        assert_eq!(genome, vec![1.0, 2.0, 3.0]);
    }
}
