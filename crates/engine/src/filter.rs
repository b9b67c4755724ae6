use core_types::{ExecutiveCompensationResult, ExecutiveRecord};
use std::collections::HashMap;

/// Executives must earn at least this multiple of their industry average to be reported.
pub const DEFAULT_COMPENSATION_MULTIPLE: f64 = 1.1;

/// Keeps the executives whose total compensation is at least `multiple` times the
/// benchmark of their industry.
///
/// Executives without an industry, or whose industry has no benchmark, are skipped.
/// Input order is preserved and nothing is deduplicated: someone listed at two
/// companies is reported once per listing.
pub fn filter_by_benchmark(
    executives: &[ExecutiveRecord],
    benchmark_by_industry: &HashMap<String, f64>,
    multiple: f64,
) -> Vec<ExecutiveCompensationResult> {
    executives
        .iter()
        .filter(|e| !e.industry_title.is_empty())
        .filter_map(|e| {
            let average = *benchmark_by_industry.get(&e.industry_title)?;
            (e.total_compensation >= multiple * average).then(|| ExecutiveCompensationResult {
                name_and_position: e.name_and_position.clone(),
                compensation: e.total_compensation,
                average_industry_compensation: average,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executive(name: &str, total: f64, industry: &str) -> ExecutiveRecord {
        ExecutiveRecord {
            company_symbol: "BRDL".to_string(),
            industry_title: industry.to_string(),
            name_and_position: name.to_string(),
            total_compensation: total,
        }
    }

    fn benchmarks(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn threshold_is_inclusive() {
        let executives = vec![
            executive("At threshold", 150.0, "A"),
            executive("Just below", 149.99, "A"),
        ];
        let result = filter_by_benchmark(&executives, &benchmarks(&[("A", 100.0)]), 1.5);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name_and_position, "At threshold");
        assert_eq!(result[0].average_industry_compensation, 100.0);
    }

    #[test]
    fn unknown_and_empty_industries_are_skipped() {
        let executives = vec![
            executive("Sarah Graff VP", 150000.0, "TYPO SERVICES"),
            executive("Scott Silver VP", 200000.0, ""),
        ];
        let result = filter_by_benchmark(
            &executives,
            &benchmarks(&[("BOARD SERVICES", 100000.0), ("", 1.0)]),
            DEFAULT_COMPENSATION_MULTIPLE,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn duplicates_are_reported_per_occurrence() {
        let executives = vec![
            executive("Steve Pell CEO", 110001.0, "BOARD SERVICES"),
            executive("Steve Pell CEO", 300000.0, "WEB API DEVELOPMENT"),
        ];
        let result = filter_by_benchmark(
            &executives,
            &benchmarks(&[("BOARD SERVICES", 100000.0), ("WEB API DEVELOPMENT", 42.0)]),
            DEFAULT_COMPENSATION_MULTIPLE,
        );
        assert_eq!(
            result,
            vec![
                ExecutiveCompensationResult {
                    name_and_position: "Steve Pell CEO".to_string(),
                    compensation: 110001.0,
                    average_industry_compensation: 100000.0,
                },
                ExecutiveCompensationResult {
                    name_and_position: "Steve Pell CEO".to_string(),
                    compensation: 300000.0,
                    average_industry_compensation: 42.0,
                },
            ]
        );
    }
}
