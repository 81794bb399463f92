use palette::Hsl;
use tracing::debug;

use crate::color::Color;
use crate::config::EngineConfig;

/// Where a color sample was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SampleSource {
    CssBackground,
    ImageDominant,
    CssText,
    ImageSecondary,
}

/// Source-priority multipliers, indexed by `SampleSource as usize`.
const SOURCE_PRIORITY: [f32; 4] = [4.0, 3.0, 2.0, 1.0];

impl SampleSource {
    pub const ALL: [SampleSource; 4] = [
        SampleSource::CssBackground,
        SampleSource::ImageDominant,
        SampleSource::CssText,
        SampleSource::ImageSecondary,
    ];

    /// Multiplier applied to a sample's raw weight before aggregation.
    pub fn priority(self) -> f32 {
        SOURCE_PRIORITY[self as usize]
    }
}

/// A weighted color observation produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    pub color: Color,
    pub weight: f32,
    pub source: SampleSource,
}

impl ColorSample {
    pub fn new(color: Color, weight: f32, source: SampleSource) -> Self {
        Self {
            color,
            weight,
            source,
        }
    }

    fn effective_weight(&self) -> f32 {
        self.weight * self.source.priority()
    }
}

/// Deduplicated candidates sorted by descending effective weight.
///
/// No two entries are closer than the merge threshold used to build the pool,
/// and the pool is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePool {
    candidates: Vec<ColorSample>,
}

impl CandidatePool {
    pub fn candidates(&self) -> &[ColorSample] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The seed used when a site yields no usable samples.
    fn fallback() -> Self {
        Self {
            candidates: vec![
                ColorSample::new(Color::BLACK, 1.0, SampleSource::CssBackground),
                ColorSample::new(Color::WHITE, 1.0, SampleSource::CssText),
            ],
        }
    }
}

/// A group of merged samples under construction.
struct Group {
    seed: Color,
    members: Vec<ColorSample>,
}

impl Group {
    fn weight(&self) -> f32 {
        self.members.iter().map(|m| m.weight).sum()
    }

    /// Collapse the group into one candidate: summed weight, HSL-averaged color,
    /// and the source of the heaviest member.
    fn into_candidate(self) -> ColorSample {
        let weight = self.weight();
        let color = if self.members.iter().all(|m| m.color == self.seed) {
            self.seed
        } else {
            average_hsl(&self.members).unwrap_or(self.seed)
        };
        let source = self.members[0].source;
        ColorSample::new(color, weight, source)
    }
}

/// Merge raw samples into a ranked, deduplicated candidate pool.
///
/// Samples with non-finite or non-positive weight are ignored. When nothing
/// usable remains the pool is seeded with black (background) and white (text).
pub fn aggregate(samples: &[ColorSample], config: &EngineConfig) -> CandidatePool {
    let mut weighted: Vec<ColorSample> = samples
        .iter()
        .filter(|s| s.weight.is_finite() && s.weight > 0.0)
        .map(|s| ColorSample::new(s.color, s.effective_weight(), s.source))
        .collect();

    if weighted.is_empty() {
        debug!("no usable samples, using black/white fallback pool");
        return CandidatePool::fallback();
    }

    sort_candidates(&mut weighted);

    // Greedy pass: each sample joins the first group whose seed is close enough.
    let mut groups: Vec<Group> = Vec::new();
    for sample in weighted {
        let home = groups.iter_mut().find(|g| {
            Color::perceptual_distance(&g.seed, &sample.color) < config.merge_threshold
        });
        match home {
            Some(group) => group.members.push(sample),
            None => groups.push(Group {
                seed: sample.color,
                members: vec![sample],
            }),
        }
    }

    let mut candidates: Vec<ColorSample> =
        groups.into_iter().map(Group::into_candidate).collect();

    // Averaging can pull representatives together; merge until none are close.
    // Every merge removes an entry, so this terminates.
    while let Some((i, j)) = first_close_pair(&candidates, config.merge_threshold) {
        let absorbed = candidates.remove(j);
        let kept = candidates[i];
        let members = vec![kept, absorbed];
        let color = average_hsl(&members).unwrap_or(kept.color);
        let source = if absorbed.weight > kept.weight {
            absorbed.source
        } else {
            kept.source
        };
        candidates[i] = ColorSample::new(color, kept.weight + absorbed.weight, source);
    }

    sort_candidates(&mut candidates);
    debug!(candidates = candidates.len(), "aggregated candidate pool");
    CandidatePool { candidates }
}

/// Descending weight; ties broken by source priority, then by color.
fn sort_candidates(candidates: &mut [ColorSample]) {
    candidates.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.color.cmp(&b.color))
    });
}

fn first_close_pair(candidates: &[ColorSample], threshold: f32) -> Option<(usize, usize)> {
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            if Color::perceptual_distance(&candidates[i].color, &candidates[j].color) < threshold {
                return Some((i, j));
            }
        }
    }
    None
}

/// Weighted average in HSL. Hue is averaged on the circle, weighted by
/// saturation as well so near-grays do not drag the hue around.
fn average_hsl(members: &[ColorSample]) -> Option<Color> {
    let total: f32 = members.iter().map(|m| m.weight).sum();
    if total <= 0.0 {
        return None;
    }

    let mut x = 0.0f32;
    let mut y = 0.0f32;
    let mut saturation = 0.0f32;
    let mut lightness = 0.0f32;
    for member in members {
        let hsl = member.color.to_hsl();
        let w = member.weight / total;
        let radians = hsl.hue.into_positive_degrees().to_radians();
        x += w * hsl.saturation * radians.cos();
        y += w * hsl.saturation * radians.sin();
        saturation += w * hsl.saturation;
        lightness += w * hsl.lightness;
    }

    let hue = if x.abs() < 1e-6 && y.abs() < 1e-6 {
        members[0].color.hue()
    } else {
        y.atan2(x).to_degrees().rem_euclid(360.0)
    };
    Some(Color::from_hsl(Hsl::new(hue, saturation, lightness)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(r: u8, g: u8, b: u8, weight: f32, source: SampleSource) -> ColorSample {
        ColorSample::new(Color::new(r, g, b), weight, source)
    }

    #[test]
    fn priority_table_orders_sources() {
        let priorities: Vec<f32> = SampleSource::ALL.iter().map(|s| s.priority()).collect();
        for pair in priorities.windows(2) {
            assert!(pair[0] > pair[1], "priorities not descending: {priorities:?}");
        }
    }

    #[test]
    fn empty_input_uses_fallback_seed() {
        let pool = aggregate(&[], &EngineConfig::default());
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.candidates()[0].color, Color::BLACK);
        assert_eq!(pool.candidates()[0].source, SampleSource::CssBackground);
        assert_eq!(pool.candidates()[1].color, Color::WHITE);
    }

    #[test]
    fn zero_and_non_finite_weights_are_ignored() {
        let samples = [
            sample(10, 20, 30, 0.0, SampleSource::CssText),
            sample(200, 20, 30, f32::NAN, SampleSource::CssText),
            sample(20, 200, 30, f32::INFINITY, SampleSource::CssText),
        ];
        let pool = aggregate(&samples, &EngineConfig::default());
        assert_eq!(pool, CandidatePool::fallback());
    }

    #[test]
    fn identical_samples_merge_and_sum_weights() {
        let samples = [
            sample(200, 40, 40, 2.0, SampleSource::CssText),
            sample(200, 40, 40, 3.0, SampleSource::CssText),
        ];
        let pool = aggregate(&samples, &EngineConfig::default());
        assert_eq!(pool.len(), 1);
        let only = pool.candidates()[0];
        assert_eq!(only.color, Color::new(200, 40, 40));
        assert!((only.weight - 5.0 * SampleSource::CssText.priority()).abs() < 1e-4);
    }

    #[test]
    fn near_duplicates_merge_to_weighted_average() {
        let samples = [
            sample(100, 100, 200, 3.0, SampleSource::CssText),
            sample(102, 102, 202, 1.0, SampleSource::CssText),
        ];
        let pool = aggregate(&samples, &EngineConfig::default());
        assert_eq!(pool.len(), 1);
        let merged = pool.candidates()[0].color;
        assert!(merged.r >= 100 && merged.r <= 102, "got {merged:?}");
        assert!(merged.b >= 200 && merged.b <= 202, "got {merged:?}");
    }

    #[test]
    fn hue_average_wraps_around_red() {
        // Hues ~355° and ~5°: a naive mean would land on cyan.
        let a = Color::from_hsl(Hsl::new(355.0, 0.8, 0.5));
        let b = Color::from_hsl(Hsl::new(5.0, 0.8, 0.5));
        let members = [
            ColorSample::new(a, 1.0, SampleSource::CssText),
            ColorSample::new(b, 1.0, SampleSource::CssText),
        ];
        let hue = average_hsl(&members).unwrap().hue();
        assert!(hue < 10.0 || hue > 350.0, "expected red hue, got {hue}");
    }

    #[test]
    fn source_priority_applies_before_ranking() {
        let samples = [
            sample(250, 250, 250, 3.0, SampleSource::ImageSecondary),
            sample(20, 20, 40, 1.0, SampleSource::CssBackground),
        ];
        let pool = aggregate(&samples, &EngineConfig::default());
        assert_eq!(pool.candidates()[0].color, Color::new(20, 20, 40));
        assert!((pool.candidates()[0].weight - 4.0).abs() < 1e-4);
        assert!((pool.candidates()[1].weight - 3.0).abs() < 1e-4);
    }

    #[test]
    fn pool_is_sorted_and_spread_out() {
        let config = EngineConfig::default();
        let mut samples = Vec::new();
        for i in 0..40u8 {
            samples.push(sample(
                i.wrapping_mul(37),
                i.wrapping_mul(91),
                i.wrapping_mul(53),
                (i % 7 + 1) as f32,
                SampleSource::ALL[(i % 4) as usize],
            ));
        }
        let pool = aggregate(&samples, &config);
        let candidates = pool.candidates();
        for pair in candidates.windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
        }
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                let d = Color::perceptual_distance(&candidates[i].color, &candidates[j].color);
                assert!(d >= config.merge_threshold, "entries {i} and {j} too close: {d}");
            }
        }
    }

    #[test]
    fn heaviest_member_decides_source() {
        let samples = [
            sample(30, 30, 30, 1.0, SampleSource::CssText),
            sample(30, 30, 31, 5.0, SampleSource::CssBackground),
        ];
        let pool = aggregate(&samples, &EngineConfig::default());
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.candidates()[0].source, SampleSource::CssBackground);
    }
}
