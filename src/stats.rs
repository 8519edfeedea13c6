//! Analytics aggregation over the pre-computed statistics datasets.
//!
//! Pure, synchronous transformations: ranking views, a log-normalized
//! word-cloud transform, workday/weekend summaries, a side-by-side city
//! comparison table and top-N activity lists. No I/O; everything is
//! deterministic given the same inputs, except for word-cloud color
//! picking, which draws from the caller-supplied RNG.

use chrono::DateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{CityStats, DailyStats, DayType};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the word-cloud transform.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Font size at scale 0, in em.
    /// Default: 0.1
    pub font_base_em: f64,
    /// Font size span across the scale range, in em.
    /// Default: 3.0
    pub font_span_em: f64,
    /// Colors tags are drawn from, uniformly at random.
    pub palette: Vec<String>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            font_base_em: 0.1,
            font_span_em: 3.0,
            palette: [
                "#FF6B6B", "#FF8C42", "#FFA07A", "#FF7F50", "#FF4500", "#FF6347", "#E74C3C",
                "#D35400", "#3498DB", "#2980B9", "#4B89DC", "#5DADE2", "#1ABC9C", "#FF5733",
                "#FF8533", "#FF4D4D", "#4169E1", "#4682B4",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

// ============================================================================
// View Models
// ============================================================================

/// One word-cloud tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudTag {
    pub city_name: String,
    pub province_name: String,
    /// Point count backing this tag
    pub count: i64,
    /// Log-normalized weight in [0, 1]
    pub scale: f64,
    /// Affine font size: base + scale * span, in em
    pub font_size_em: f64,
    /// Color drawn from the configured palette
    pub color: String,
}

/// Aggregate summary of one day-type partition.
///
/// An empty partition yields NaN means; check [`DayTypeSummary::has_data`]
/// before display. Defaulting the means to zero would misrepresent an
/// absent partition as a sedentary one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTypeSummary {
    pub day_type: DayType,
    /// Rows contributing to this partition
    pub city_count: usize,
    /// Total distance in meters
    pub total_distance: f64,
    /// Mean of per-row average speeds, m/s
    pub avg_speed: f64,
    /// Mean of per-row average altitudes, meters
    pub avg_altitude: f64,
    /// Total active days
    pub total_days: u32,
    pub total_points: i64,
    /// Weighted average daily distance in meters:
    /// sum(distance_per_day * days_count) / sum(days_count)
    pub avg_daily_distance: f64,
}

impl DayTypeSummary {
    /// Whether the partition had any rows. When false, the mean fields are
    /// NaN and must not be displayed.
    pub fn has_data(&self) -> bool {
        self.city_count > 0
    }
}

/// One row of the workday/weekend comparison table.
///
/// A city present in only one partition gets exact zeros on the missing
/// side; this is a deliberate default for side-by-side comparison, unlike
/// the whole-partition edge case on [`DayTypeSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityComparison {
    pub city_name: String,
    /// m/s, two decimals
    pub workday_speed: f64,
    /// m/s, two decimals
    pub weekend_speed: f64,
    /// meters, whole
    pub workday_altitude: f64,
    /// meters, whole
    pub weekend_altitude: f64,
    /// km per day, two decimals
    pub workday_distance_km: f64,
    /// km per day, two decimals
    pub weekend_distance_km: f64,
}

/// Headline numbers over the whole city dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub city_count: usize,
    pub total_points: i64,
    pub total_visit_days: u32,
    /// Earliest first-visit month, formatted `YYYY-MM`
    pub earliest_visit: Option<String>,
}

// ============================================================================
// Ranking Views
// ============================================================================

/// Cities sorted ascending by first visit time. Stable: ties keep the
/// input order.
pub fn rank_by_first_visit(cities: &[CityStats]) -> Vec<CityStats> {
    let mut sorted = cities.to_vec();
    sorted.sort_by(|a, b| a.first_visit_time.cmp(&b.first_visit_time));
    sorted
}

/// Cities sorted descending by point count. Stable: ties keep the input
/// order.
pub fn rank_by_frequency(cities: &[CityStats]) -> Vec<CityStats> {
    let mut sorted = cities.to_vec();
    sorted.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    sorted
}

// ============================================================================
// Word Cloud
// ============================================================================

/// Log-normalized word-cloud tags for the full city set.
///
/// `scale = (ln(points) - ln(min)) / (ln(max) - ln(min))` over all cities.
/// When every city has the same point count the ratio is undefined; the
/// scale is then uniformly 1.0, which also makes a single-city set render
/// at full weight. Point counts are clamped to >= 1 before taking logs.
pub fn word_cloud<R: Rng>(
    cities: &[CityStats],
    config: &CloudConfig,
    rng: &mut R,
) -> Vec<CloudTag> {
    let max_points = cities.iter().map(|c| c.total_points.max(1)).max();
    let min_points = cities.iter().map(|c| c.total_points.max(1)).min();
    let (max_points, min_points) = match (max_points, min_points) {
        (Some(max), Some(min)) => (max as f64, min as f64),
        _ => return Vec::new(),
    };

    let log_max = max_points.ln();
    let log_min = min_points.ln();
    let log_span = log_max - log_min;

    cities
        .iter()
        .map(|city| {
            let scale = if log_span > 0.0 {
                ((city.total_points.max(1) as f64).ln() - log_min) / log_span
            } else {
                1.0
            };
            CloudTag {
                city_name: city.city_name.clone(),
                province_name: city.province_name.clone(),
                count: city.total_points,
                scale,
                font_size_em: config.font_base_em + scale * config.font_span_em,
                color: pick_color(config, rng),
            }
        })
        .collect()
}

fn pick_color<R: Rng>(config: &CloudConfig, rng: &mut R) -> String {
    if config.palette.is_empty() {
        return String::new();
    }
    config.palette[rng.gen_range(0..config.palette.len())].clone()
}

// ============================================================================
// Workday / Weekend
// ============================================================================

/// Summarize one day-type partition of the daily dataset.
pub fn day_type_summary(daily: &[DailyStats], day_type: DayType) -> DayTypeSummary {
    let rows: Vec<&DailyStats> = daily.iter().filter(|d| d.day_type == day_type).collect();
    let count = rows.len();

    let total_distance: f64 = rows.iter().map(|d| d.total_distance).sum();
    let total_days: u32 = rows.iter().map(|d| d.days_count).sum();
    let total_points: i64 = rows.iter().map(|d| d.total_points).sum();
    let weighted_distance: f64 = rows
        .iter()
        .map(|d| d.distance_per_day * d.days_count as f64)
        .sum();

    DayTypeSummary {
        day_type,
        city_count: count,
        total_distance,
        avg_speed: rows.iter().map(|d| d.avg_speed).sum::<f64>() / count as f64,
        avg_altitude: rows.iter().map(|d| d.avg_altitude).sum::<f64>() / count as f64,
        total_days,
        total_points,
        avg_daily_distance: weighted_distance / total_days as f64,
    }
}

/// Side-by-side workday/weekend rows for every distinct city in the daily
/// dataset, in first-appearance order. A missing side is zero-valued.
pub fn city_comparison(daily: &[DailyStats]) -> Vec<CityComparison> {
    let mut cities: Vec<&str> = Vec::new();
    for row in daily {
        if !cities.contains(&row.city_name.as_str()) {
            cities.push(&row.city_name);
        }
    }

    cities
        .iter()
        .map(|city| {
            let side = |day_type: DayType| {
                daily
                    .iter()
                    .find(|d| d.city_name == *city && d.day_type == day_type)
            };
            let workday = side(DayType::Workday);
            let weekend = side(DayType::Weekend);

            let speed = |row: Option<&DailyStats>| round2(row.map_or(0.0, |d| d.avg_speed));
            let altitude = |row: Option<&DailyStats>| row.map_or(0.0, |d| d.avg_altitude).round();
            let distance_km =
                |row: Option<&DailyStats>| round2(row.map_or(0.0, |d| d.distance_per_day) / 1000.0);

            CityComparison {
                city_name: city.to_string(),
                workday_speed: speed(workday),
                weekend_speed: speed(weekend),
                workday_altitude: altitude(workday),
                weekend_altitude: altitude(weekend),
                workday_distance_km: distance_km(workday),
                weekend_distance_km: distance_km(weekend),
            }
        })
        .collect()
}

/// The `n` most active rows of one day-type partition, descending by
/// average daily distance.
pub fn top_by_daily_distance(daily: &[DailyStats], day_type: DayType, n: usize) -> Vec<DailyStats> {
    let mut rows: Vec<DailyStats> = daily
        .iter()
        .filter(|d| d.day_type == day_type)
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.distance_per_day.total_cmp(&a.distance_per_day));
    rows.truncate(n);
    rows
}

// ============================================================================
// Overview
// ============================================================================

/// Headline numbers over the city dataset.
pub fn overview(cities: &[CityStats]) -> Overview {
    Overview {
        city_count: cities.len(),
        total_points: cities.iter().map(|c| c.total_points).sum(),
        total_visit_days: cities.iter().map(|c| c.visit_days).sum(),
        earliest_visit: cities
            .iter()
            .map(|c| c.first_visit_time)
            .min()
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.format("%Y-%m").to_string()),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn city(name: &str, total_points: i64, first_visit_time: i64) -> CityStats {
        CityStats {
            city_name: name.to_string(),
            province_name: format!("{name}-province"),
            first_visit_time,
            last_visit_time: first_visit_time + 86_400,
            total_points,
            visit_days: 1,
            avg_altitude: 50.0,
            avg_speed: 1.5,
            visit_order: 0,
            frequency_rank: 0,
        }
    }

    fn daily(
        name: &str,
        day_type: DayType,
        days_count: u32,
        distance_per_day: f64,
    ) -> DailyStats {
        DailyStats {
            day_type,
            city_name: name.to_string(),
            province_name: format!("{name}-province"),
            total_points: 100,
            days_count,
            avg_speed: 1.2,
            avg_altitude: 44.4,
            total_distance: distance_per_day * days_count as f64,
            distance_per_day,
            activity_rank: 1,
        }
    }

    #[test]
    fn test_rank_by_first_visit_ascending() {
        let cities = vec![city("b", 10, 300), city("a", 20, 100), city("c", 30, 200)];
        let ranked = rank_by_first_visit(&cities);
        let names: Vec<&str> = ranked.iter().map(|c| c.city_name.as_str()).collect();
        assert_eq!(names, ["a", "c", "b"]);
    }

    #[test]
    fn test_rank_by_frequency_is_stable_permutation() {
        let cities = vec![
            city("a", 10, 0),
            city("b", 30, 0),
            city("c", 10, 0),
            city("d", 20, 0),
        ];
        let ranked = rank_by_frequency(&cities);
        let names: Vec<&str> = ranked.iter().map(|c| c.city_name.as_str()).collect();
        // Descending by points; the tie between a and c keeps input order.
        assert_eq!(names, ["b", "d", "a", "c"]);
        assert_eq!(ranked.len(), cities.len());
    }

    #[test]
    fn test_word_cloud_scale_bounds_and_monotonicity() {
        let cities = vec![
            city("small", 10, 0),
            city("mid", 500, 0),
            city("big", 40_000, 0),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let tags = word_cloud(&cities, &CloudConfig::default(), &mut rng);

        assert_eq!(tags.len(), 3);
        for tag in &tags {
            assert!((0.0..=1.0).contains(&tag.scale), "scale out of range");
        }
        assert_eq!(tags[0].scale, 0.0);
        assert_eq!(tags[2].scale, 1.0);
        assert!(tags[0].scale <= tags[1].scale && tags[1].scale <= tags[2].scale);

        // Affine font mapping
        let config = CloudConfig::default();
        assert!(
            (tags[2].font_size_em - (config.font_base_em + config.font_span_em)).abs() < 1e-9
        );
    }

    #[test]
    fn test_word_cloud_degenerate_uniform_scale() {
        // Single city: min == max must not divide by zero.
        let mut rng = StdRng::seed_from_u64(7);
        let tags = word_cloud(&[city("only", 42, 0)], &CloudConfig::default(), &mut rng);
        assert_eq!(tags[0].scale, 1.0);
        assert!(tags[0].font_size_em.is_finite());

        // Several cities with identical counts: uniformly 1.0.
        let cities = vec![city("a", 7, 0), city("b", 7, 0)];
        let tags = word_cloud(&cities, &CloudConfig::default(), &mut rng);
        assert!(tags.iter().all(|t| t.scale == 1.0));
    }

    #[test]
    fn test_word_cloud_colors_come_from_palette() {
        let cities: Vec<CityStats> = (0..50).map(|i| city("c", 10 + i, 0)).collect();
        let config = CloudConfig::default();
        let mut rng = StdRng::seed_from_u64(99);
        let tags = word_cloud(&cities, &config, &mut rng);
        assert!(tags.iter().all(|t| config.palette.contains(&t.color)));
    }

    #[test]
    fn test_weighted_average_daily_distance() {
        let daily = vec![
            daily("a", DayType::Workday, 2, 10.0),
            daily("b", DayType::Workday, 3, 20.0),
        ];
        let summary = day_type_summary(&daily, DayType::Workday);
        assert_eq!(summary.avg_daily_distance, 16.0);
        assert_eq!(summary.total_days, 5);
        assert_eq!(summary.total_distance, 80.0);
        assert!(summary.has_data());
    }

    #[test]
    fn test_empty_partition_yields_nan_means() {
        let daily = vec![daily("a", DayType::Workday, 2, 10.0)];
        let summary = day_type_summary(&daily, DayType::Weekend);
        assert!(!summary.has_data());
        assert!(summary.avg_speed.is_nan());
        assert!(summary.avg_altitude.is_nan());
        assert!(summary.avg_daily_distance.is_nan());
        // Sums are still well-defined for an empty partition.
        assert_eq!(summary.total_distance, 0.0);
        assert_eq!(summary.total_points, 0);
    }

    #[test]
    fn test_city_comparison_zero_fills_missing_side() {
        let rows = vec![
            daily("both", DayType::Workday, 2, 1500.0),
            daily("both", DayType::Weekend, 1, 3000.0),
            daily("weekday-only", DayType::Workday, 4, 2000.0),
        ];
        let table = city_comparison(&rows);
        assert_eq!(table.len(), 2);

        let solo = table
            .iter()
            .find(|r| r.city_name == "weekday-only")
            .unwrap();
        assert_eq!(solo.weekend_speed, 0.0);
        assert_eq!(solo.weekend_altitude, 0.0);
        assert_eq!(solo.weekend_distance_km, 0.0);
        assert_eq!(solo.workday_distance_km, 2.0);

        let both = table.iter().find(|r| r.city_name == "both").unwrap();
        assert_eq!(both.workday_distance_km, 1.5);
        assert_eq!(both.weekend_distance_km, 3.0);
        assert_eq!(both.workday_altitude, 44.0);
    }

    #[test]
    fn test_city_comparison_rounding() {
        let mut row = daily("x", DayType::Workday, 1, 1234.5);
        row.avg_speed = 1.23456;
        row.avg_altitude = 43.6;
        let table = city_comparison(&[row]);
        assert_eq!(table[0].workday_speed, 1.23);
        assert_eq!(table[0].workday_altitude, 44.0);
        assert_eq!(table[0].workday_distance_km, 1.23);
    }

    #[test]
    fn test_top_by_daily_distance_truncates_to_n() {
        let rows: Vec<DailyStats> = (0..8)
            .map(|i| daily(&format!("c{i}"), DayType::Weekend, 1, i as f64 * 100.0))
            .collect();
        let top = top_by_daily_distance(&rows, DayType::Weekend, 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].city_name, "c7");
        assert!(top
            .windows(2)
            .all(|w| w[0].distance_per_day >= w[1].distance_per_day));

        // Other partition is independent and empty here.
        assert!(top_by_daily_distance(&rows, DayType::Workday, 5).is_empty());
    }

    #[test]
    fn test_overview() {
        let cities = vec![city("a", 10, 0), city("b", 20, 1_700_000_000)];
        let summary = overview(&cities);
        assert_eq!(summary.city_count, 2);
        assert_eq!(summary.total_points, 30);
        assert_eq!(summary.total_visit_days, 2);
        assert_eq!(summary.earliest_visit.as_deref(), Some("1970-01"));

        let empty = overview(&[]);
        assert_eq!(empty.city_count, 0);
        assert!(empty.earliest_visit.is_none());
    }
}
