use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::{ReduceError, Result};

lazy_static! {
    /// Benchmark name to the chart title it is plotted under.
    static ref DEFAULT_TITLES: Vec<(&'static str, &'static str)> = vec![
        ("queue", "Priority Queue"),
        ("vector", "Vector"),
        ("map", "Unordered Map"),
        ("ordered-map", "Map"),
        ("kvtree2", "PMemKV"),
        ("hash-map", "HashMap"),
        // RocksDB
        ("a-sync", "A-Sync"),
        ("b-sync", "B-Sync"),
        ("a-async", "A-Async"),
        ("b-async", "B-Async"),
        ("a-pronto", "A-Pronto"),
        ("b-pronto", "B-Pronto"),
        ("a-pronto-sync", "A-Pronto-Sync"),
        ("b-pronto-sync", "B-Pronto-Sync"),
    ];
}

#[derive(Debug, Clone)]
pub struct TitleMap {
    map: HashMap<String, String>,
}

impl Default for TitleMap {
    fn default() -> Self {
        TitleMap {
            map: DEFAULT_TITLES.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }
}

impl TitleMap {
    pub fn empty() -> Self {
        TitleMap { map: HashMap::new() }
    }

    /// Add or replace the title for `bench`.
    pub fn insert(&mut self, bench: impl Into<String>, title: impl Into<String>) {
        self.map.insert(bench.into(), title.into());
    }

    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (bench, title) in overrides {
            self.insert(bench, title);
        }
        self
    }

    pub fn lookup(&self, bench: &str) -> Result<&str> {
        self.map
            .get(bench)
            .map(String::as_str)
            .ok_or_else(|| ReduceError::UnknownBenchmark(bench.to_string()))
    }
}
