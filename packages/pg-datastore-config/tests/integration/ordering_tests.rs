//! Last-write-wins ordering of options.

use std::time::Duration;

use pg_datastore_config::options::{self, DatastoreOption};
use pg_datastore_config::{generate_config, Base2Bytes, ConfigBuilder, ConfigField, PostgresConfig};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_second_option_on_same_field_wins() {
    let config = generate_config([
        options::max_open_conns(10),
        options::watch_buffer_length(64),
        options::conn_max_idle_time(Duration::from_secs(5)),
        options::max_open_conns(25),
        options::conn_max_idle_time(Duration::ZERO),
    ])
    .unwrap();

    assert_eq!(config.max_open_conns(), Some(25));
    assert_eq!(config.conn_max_idle_time(), Some(Duration::ZERO));
    assert_eq!(config.watch_buffer_length(), 64);
}

#[test]
fn test_later_window_can_rescue_invalid_earlier_window() {
    let config = generate_config([
        options::gc_window(Duration::from_secs(1)),
        options::revision_fuzzing_timedelta(Duration::from_secs(5)),
        options::gc_window(Duration::from_secs(3600)),
    ])
    .unwrap();
    assert_eq!(config.gc_window(), Duration::from_secs(3600));
}

#[test]
fn test_later_window_can_invalidate_config() {
    let result = ConfigBuilder::new()
        .with(options::revision_fuzzing_timedelta(Duration::from_secs(5)))
        .with(options::gc_window(Duration::from_secs(3600)))
        .with(options::gc_window(Duration::from_secs(5)))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_split_size_override() {
    let config = generate_config([
        options::split_at_estimated_query_size(Base2Bytes::mib(1)),
        options::split_at_estimated_query_size(Base2Bytes::kib(256)),
    ])
    .unwrap();
    assert_eq!(config.split_at_estimated_query_size(), Base2Bytes::kib(256));
}

fn any_option() -> impl Strategy<Value = DatastoreOption> {
    let secs = || (0u64..600).prop_map(Duration::from_secs);
    prop_oneof![
        (1u64..4096).prop_map(|k| options::split_at_estimated_query_size(Base2Bytes::kib(k))),
        secs().prop_map(options::conn_max_idle_time),
        secs().prop_map(options::conn_max_lifetime),
        secs().prop_map(options::health_check_period),
        (-5i32..100).prop_map(options::max_open_conns),
        (-5i32..100).prop_map(options::min_open_conns),
        any::<u16>().prop_map(options::watch_buffer_length),
        (0u64..1000)
            .prop_map(|ms| options::revision_fuzzing_timedelta(Duration::from_millis(ms))),
        (1u64..48)
            .prop_map(|h| options::gc_window(Duration::from_secs(h * 3600))),
        Just(options::enable_prometheus_stats()),
        Just(options::enable_tracing()),
    ]
}

/// Value the last option targeting `field` wrote, or `None` if none did.
fn last_write(opts: &[DatastoreOption], field: ConfigField) -> Option<DatastoreOption> {
    opts.iter().rev().find(|o| o.field() == field).copied()
}

fn field_value(config: &PostgresConfig, field: ConfigField) -> DatastoreOption {
    match field {
        ConfigField::SplitAtEstimatedQuerySize => {
            DatastoreOption::SplitAtEstimatedQuerySize(config.split_at_estimated_query_size())
        }
        ConfigField::ConnMaxIdleTime => {
            DatastoreOption::ConnMaxIdleTime(config.conn_max_idle_time().unwrap())
        }
        ConfigField::ConnMaxLifetime => {
            DatastoreOption::ConnMaxLifetime(config.conn_max_lifetime().unwrap())
        }
        ConfigField::HealthCheckPeriod => {
            DatastoreOption::HealthCheckPeriod(config.health_check_period().unwrap())
        }
        ConfigField::MaxOpenConns => DatastoreOption::MaxOpenConns(config.max_open_conns().unwrap()),
        ConfigField::MinOpenConns => DatastoreOption::MinOpenConns(config.min_open_conns().unwrap()),
        ConfigField::WatchBufferLength => {
            DatastoreOption::WatchBufferLength(config.watch_buffer_length())
        }
        ConfigField::RevisionFuzzingTimedelta => {
            DatastoreOption::RevisionFuzzingTimedelta(config.revision_fuzzing_timedelta())
        }
        ConfigField::GcWindow => DatastoreOption::GcWindow(config.gc_window()),
        ConfigField::EnablePrometheusStats => {
            assert!(config.enable_prometheus_stats());
            DatastoreOption::EnablePrometheusStats
        }
        ConfigField::Logger => {
            assert!(config.tracing_enabled());
            DatastoreOption::EnableTracing
        }
    }
}

const ALL_FIELDS: [ConfigField; 11] = [
    ConfigField::SplitAtEstimatedQuerySize,
    ConfigField::ConnMaxIdleTime,
    ConfigField::ConnMaxLifetime,
    ConfigField::HealthCheckPeriod,
    ConfigField::MaxOpenConns,
    ConfigField::MinOpenConns,
    ConfigField::WatchBufferLength,
    ConfigField::RevisionFuzzingTimedelta,
    ConfigField::GcWindow,
    ConfigField::EnablePrometheusStats,
    ConfigField::Logger,
];

proptest! {
    #[test]
    fn prop_every_field_holds_its_last_write(opts in prop::collection::vec(any_option(), 0..24)) {
        let config = generate_config(opts.clone()).unwrap();
        let defaults = PostgresConfig::default();

        for field in ALL_FIELDS {
            match last_write(&opts, field) {
                Some(expected) => prop_assert_eq!(field_value(&config, field), expected),
                None => {
                    let built = serde_json::to_value(&config).unwrap();
                    let default = serde_json::to_value(&defaults).unwrap();
                    prop_assert_eq!(&built[field.as_str()], &default[field.as_str()]);
                }
            }
        }
    }

    #[test]
    fn prop_reordering_across_fields_is_irrelevant(
        opts in prop::collection::vec(any_option(), 0..24),
    ) {
        // Stable sort by field keeps same-field order, changes interleaving.
        let mut grouped = opts.clone();
        grouped.sort_by_key(|o| o.field());

        prop_assert_eq!(
            generate_config(opts).unwrap(),
            generate_config(grouped).unwrap()
        );
    }
}
