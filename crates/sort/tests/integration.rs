use std::collections::BTreeMap;
use std::path::PathBuf;

use printpost_plan::{load_sort_plan, Destination, LookupTable, StateCode};
use printpost_sort::config::SortConfig;
use printpost_sort::model::{ArticleSize, Categories, CategoryEntry, PostcodeCount};
use printpost_sort::{run, sequence, Categorizer, ListMerger, RecordTable, ThresholdSchedule};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn plan() -> LookupTable {
    load_sort_plan(fixtures_dir().join("sort-plan.txt")).unwrap()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// A list with columns Name, Postcode, State, MS_SortCode built from
/// `(postcode, state, sort code, copies)` runs.
fn mail_list(name: &str, runs: &[(&str, &str, &str, usize)]) -> RecordTable {
    let mut rows = Vec::new();
    for (postcode, state, code, copies) in runs {
        for _ in 0..*copies {
            let id = format!("test{}", rows.len());
            rows.push(vec![id, postcode.to_string(), state.to_string(), code.to_string()]);
        }
    }
    RecordTable::with_identified_columns(
        name,
        strings(&["Name", "Postcode", "State", "MS_SortCode"]),
        rows,
    )
    .unwrap()
}

fn categorize(table: &RecordTable, weight: u32, size: ArticleSize) -> Categories {
    let lookup = plan();
    let schedule = ThresholdSchedule::default();
    Categorizer::new(&lookup, &schedule)
        .categorize(table, weight, size, StateCode::Vic)
        .unwrap()
}

fn state(code: StateCode) -> Destination {
    Destination::State(code)
}

/// Postcode direct in VIC and area direct in WA, plus one unresolved row.
fn postcode_and_area_list(postcode_size: usize, area_size: usize) -> RecordTable {
    let area_1 = area_size / 2;
    let area_2 = area_size - area_1;
    mail_list(
        "organise large 1",
        &[
            ("3000", "VIC", "022", postcode_size),
            ("6000", "WA", "049", area_1),
            ("6012", "WA", "049", area_2),
            ("", "", "", 1),
        ],
    )
}

/// Two postcode directs under one indicator, a sub-threshold NSW indicator,
/// area direct in WA and QLD residue.
fn multi_postcode_list(postcode_size: usize, area_size: usize) -> RecordTable {
    let area_1 = area_size / 2;
    let area_2 = area_size - area_1;
    mail_list(
        "organise large 2",
        &[
            ("3000", "VIC", "022", postcode_size),
            ("3001", "VIC", "022", postcode_size),
            ("6000", "WA", "049", area_1),
            ("6012", "WA", "049", area_2),
            ("1637", "NSW", "003", postcode_size),
            ("4518", "QLD", "002", 8),
        ],
    )
}

// -------------------------------------------------------------------------
// Categorisation scenarios
// -------------------------------------------------------------------------

#[test]
fn small_articles_count_per_state() {
    let lookup = plan();
    let mut postcodes: Vec<(&str, &str)> = lookup.postcodes().collect();
    postcodes.sort();

    let mut totals: BTreeMap<Destination, usize> = BTreeMap::new();
    let mut runs = Vec::new();
    for i in 0..99 {
        let (postcode, code) = postcodes[(i * 7) % postcodes.len()];
        let st = lookup.state_for(code).unwrap();
        *totals.entry(state(st)).or_default() += 1;
        runs.push((postcode, st.as_str(), code, 1));
    }
    runs.push(("", "", "", 1));
    *totals.entry(Destination::Other).or_default() += 1;

    let table = mail_list("small", &runs);
    let categories = categorize(&table, 50, ArticleSize::Small);

    for (destination, entries) in categories.iter() {
        match totals.get(&destination) {
            Some(&expected) => {
                assert_eq!(entries, &[CategoryEntry::Residue { count: expected }], "{destination}")
            }
            None => assert!(entries.is_empty(), "{destination} should be empty"),
        }
    }
    assert_eq!(categories.total(), 100);
    assert_eq!(categories.total_for(Destination::Other), 1);
}

#[test]
fn postcode_and_area_direct_at_every_tier_boundary() {
    for (weight, postcode_size, area_size) in [
        (125, 30, 50),
        (250, 30, 50),
        (251, 15, 25),
        (500, 15, 25),
        (501, 10, 15),
        (1000, 10, 15),
    ] {
        let table = postcode_and_area_list(postcode_size, area_size);
        let categories = categorize(&table, weight, ArticleSize::Large);

        for (destination, entries) in categories.iter() {
            let expected = match destination {
                Destination::State(StateCode::Vic) => vec![CategoryEntry::Postcode {
                    indicator: "022".into(),
                    postcodes: vec![PostcodeCount { postcode: "3000".into(), count: postcode_size }],
                }],
                Destination::State(StateCode::Wa) => vec![CategoryEntry::Area {
                    indicator: "049".into(),
                    count: area_size,
                }],
                Destination::Other => vec![CategoryEntry::Residue { count: 1 }],
                _ => vec![],
            };
            assert_eq!(entries, expected.as_slice(), "{destination} at {weight}g");
        }
    }
}

#[test]
fn one_below_each_threshold_falls_to_residue() {
    for (weight, postcode_size, area_size) in [(250, 30, 50), (500, 15, 25), (1000, 10, 15)] {
        let table = mail_list(
            "below",
            &[
                ("3000", "VIC", "022", postcode_size - 1),
                ("6000", "WA", "049", area_size - 1),
            ],
        );
        let categories = categorize(&table, weight, ArticleSize::Large);
        assert_eq!(
            categories.bucket(state(StateCode::Vic)),
            &[CategoryEntry::Residue { count: postcode_size - 1 }],
            "VIC at {weight}g"
        );
        assert_eq!(
            categories.bucket(state(StateCode::Wa)),
            &[CategoryEntry::Residue { count: area_size - 1 }],
            "WA at {weight}g"
        );
    }
}

#[test]
fn several_postcode_directs_under_one_indicator() {
    let table = multi_postcode_list(30, 50);
    let categories = categorize(&table, 125, ArticleSize::Large);

    assert_eq!(
        categories.bucket(state(StateCode::Vic)),
        &[CategoryEntry::Postcode {
            indicator: "022".into(),
            postcodes: vec![
                PostcodeCount { postcode: "3000".into(), count: 30 },
                PostcodeCount { postcode: "3001".into(), count: 30 },
            ],
        }]
    );
    assert_eq!(categories.bucket(state(StateCode::Nsw)), &[CategoryEntry::Residue { count: 30 }]);
    assert_eq!(categories.bucket(state(StateCode::Qld)), &[CategoryEntry::Residue { count: 8 }]);
    assert_eq!(
        categories.bucket(state(StateCode::Wa)),
        &[CategoryEntry::Area { indicator: "049".into(), count: 50 }]
    );
    assert!(categories.bucket(Destination::Other).is_empty());
    assert!(categories.bucket(state(StateCode::Act)).is_empty());
}

#[test]
fn postcode_direct_never_outside_lodgement_state() {
    let table = multi_postcode_list(30, 50);
    let lookup = plan();
    let schedule = ThresholdSchedule::default();
    let categories = Categorizer::new(&lookup, &schedule)
        .categorize(&table, 125, ArticleSize::Large, StateCode::Nsw)
        .unwrap();

    for (destination, entries) in categories.iter() {
        if destination == state(StateCode::Nsw) {
            continue;
        }
        assert!(
            !entries.iter().any(|e| matches!(e, CategoryEntry::Postcode { .. })),
            "{destination} has postcode direct"
        );
    }
    // VIC 022 has 60 articles: area direct once postcode direct is off.
    assert_eq!(
        categories.bucket(state(StateCode::Vic)),
        &[CategoryEntry::Area { indicator: "022".into(), count: 60 }]
    );
    assert_eq!(
        categories.bucket(state(StateCode::Nsw)),
        &[CategoryEntry::Postcode {
            indicator: "003".into(),
            postcodes: vec![PostcodeCount { postcode: "1637".into(), count: 30 }],
        }]
    );
}

// -------------------------------------------------------------------------
// Export ordering
// -------------------------------------------------------------------------

#[test]
fn export_order_matches_manifest() {
    let table = multi_postcode_list(30, 50);
    let categories = categorize(&table, 125, ArticleSize::Large);
    let ordered = sequence(table, &categories).unwrap();

    let postcodes = ordered.column("Postcode").unwrap();
    let mut expected = Vec::new();
    expected.extend(std::iter::repeat("1637").take(30));
    expected.extend(std::iter::repeat("4518").take(8));
    expected.extend(std::iter::repeat("3000").take(30));
    expected.extend(std::iter::repeat("3001").take(30));
    expected.extend(std::iter::repeat("6000").take(25));
    expected.extend(std::iter::repeat("6012").take(25));
    assert_eq!(postcodes, expected);
}

#[test]
fn merged_lists_sort_end_to_end() {
    let lookup = plan();
    let config = SortConfig::from_file(fixtures_dir().join("newsletter.sort.toml")).unwrap();

    let mut members = Vec::new();
    for i in 0..30 {
        members.push(vec![format!("member{i}"), "3000".to_string(), "Vic".to_string()]);
    }
    for i in 0..4 {
        members.push(vec![format!("member{}", 30 + i), "3001".to_string(), "VIC".to_string()]);
    }
    let members = RecordTable::with_identified_columns(
        "members",
        strings(&["Name", "Postcode", "State"]),
        members,
    )
    .unwrap();

    let mut donors = Vec::new();
    for i in 0..50 {
        let postcode = if i % 2 == 0 { "6000" } else { "6012" };
        donors.push(vec![postcode.to_string(), format!("donor{i}"), "WA".to_string()]);
    }
    donors.push(vec!["0000".to_string(), "overseas".to_string(), "NSW".to_string()]);
    let donors = RecordTable::with_identified_columns(
        "donors",
        strings(&["PostCode", "name", "State"]),
        donors,
    )
    .unwrap();

    let result = run(&config, &lookup, vec![members, donors]).unwrap();

    assert_eq!(result.summary.total_records, 85);
    assert_eq!(result.summary.postcode_direct, 30);
    assert_eq!(result.summary.area_direct, 54);
    assert_eq!(result.summary.residue, 1);
    assert_eq!(
        result.categories.bucket(state(StateCode::Vic)),
        &[
            CategoryEntry::Postcode {
                indicator: "022".into(),
                postcodes: vec![PostcodeCount { postcode: "3000".into(), count: 30 }],
            },
            CategoryEntry::Area { indicator: "022".into(), count: 4 },
        ]
    );

    assert_eq!(result.table.name(), "Exported List");
    assert_eq!(result.table.row_count(), 85);
    assert_eq!(
        result.table.headers(),
        &strings(&["Name", "Postcode", "State", "MS_State", "MS_SortCode"])[..]
    );
    let names = result.table.column("Name").unwrap();
    assert_eq!(names[0], "member0");
    assert_eq!(names[30], "member30");
    assert_eq!(names[84], "overseas");
    assert!(result.state_mismatches.is_empty());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["categories"]["VIC"][0]["category"], "postcode");
    assert_eq!(json["categories"]["WA"][0]["count"], 50);
    assert_eq!(json["summary"]["per_destination"]["Other"], 1);
    assert_eq!(json["meta"]["lodgement_state"], "VIC");
}

#[test]
fn merge_then_resequence_is_stable() {
    let a = postcode_and_area_list(30, 50);
    let b = multi_postcode_list(15, 25);
    let merged = ListMerger::default().merge(vec![a, b]).unwrap();
    let categories = categorize(&merged, 300, ArticleSize::Large);

    let once = sequence(merged, &categories).unwrap();
    let twice = sequence(once.clone(), &categories).unwrap();
    assert_eq!(once, twice);
}
