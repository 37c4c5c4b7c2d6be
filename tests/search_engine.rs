//! Search engine tests: indexing, free-text scoring, filters, auxiliary
//! lookups, and detector isolation.

use std::collections::HashSet;

use chrono::Utc;

use arch_knowledge::catalog::KnowledgeCatalog;
use arch_knowledge::engine::search::{SearchEngine, SearchOptions};
use arch_knowledge::types::{
    AntiPatternEntry, ComponentRequirement, ComponentSpec, Detector, EntryKind, FailureEntry,
    FailureImpact, KbError, KnowledgeEntry, KnowledgeSource, Likelihood, LocalizedText,
    PatternEntry, PerformanceEntry, QuickTipEntry, RangeText, RelationDirection, RelationKind,
    RelationStrength, RelationshipEntry, Severity, SourceKind, TrustMetadata,
};

// ==================== Fixture ====================

fn source(kind: SourceKind) -> KnowledgeSource {
    KnowledgeSource {
        kind,
        title: "Designing Data-Intensive Applications".to_string(),
        url: Some("https://example.com/ddia".to_string()),
        section: None,
        published: None,
        accessed: Utc::now(),
    }
}

fn trust(confidence: f64) -> TrustMetadata {
    TrustMetadata::new(confidence, vec![source(SourceKind::Industry)])
}

fn relationship(
    id: &str,
    source_component: &str,
    target_component: &str,
    relation: RelationKind,
    tags: &[&str],
    confidence: f64,
    reason: LocalizedText,
) -> KnowledgeEntry {
    KnowledgeEntry::Relationship(RelationshipEntry {
        id: id.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        trust: trust(confidence),
        source: source_component.to_string(),
        target: target_component.to_string(),
        relation,
        strength: RelationStrength::Strong,
        direction: RelationDirection::Downstream,
        reason,
    })
}

fn component_types() -> HashSet<String> {
    [
        "load-balancer",
        "web-server",
        "database",
        "cache",
        "firewall",
        "cdn",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn fixture_entries() -> Vec<KnowledgeEntry> {
    vec![
        relationship(
            "rel-lb-web",
            "load-balancer",
            "web-server",
            RelationKind::Requires,
            &["availability", "scaling"],
            0.9,
            LocalizedText::new(
                "Distributes traffic across web servers for high availability",
                "ロードバランサーは複数のウェブサーバーへトラフィックを分散します",
            ),
        ),
        relationship(
            "rel-web-db",
            "web-server",
            "database",
            RelationKind::Requires,
            &["persistence"],
            0.8,
            LocalizedText::new(
                "Application state must be persisted in a database",
                "アプリケーションの状態はデータベースに永続化する必要があります",
            ),
        ),
        relationship(
            "rel-cdn-lb",
            "cdn",
            "load-balancer",
            RelationKind::Enhances,
            &["performance", "caching"],
            0.7,
            LocalizedText::new(
                "A CDN offloads static content before it reaches the balancer",
                "CDNは静的コンテンツを配信してバランサーの負荷を減らします",
            ),
        ),
        KnowledgeEntry::Pattern(PatternEntry {
            id: "pat-three-tier".to_string(),
            tags: vec!["architecture".to_string(), "scaling".to_string()],
            trust: trust(0.95),
            name: LocalizedText::new("Three-tier architecture", "三層アーキテクチャ"),
            description: LocalizedText::new(
                "Load balancer, stateless web tier, and a shared database",
                "ロードバランサーとステートレスなウェブ層、共有データベースで構成します",
            ),
            required_components: vec![
                ComponentRequirement {
                    component: "load-balancer".to_string(),
                    min_count: 1,
                },
                ComponentRequirement {
                    component: "web-server".to_string(),
                    min_count: 2,
                },
                ComponentRequirement {
                    component: "database".to_string(),
                    min_count: 1,
                },
            ],
            optional_components: vec![],
            scalability: LocalizedText::new("Scales horizontally at the web tier", "ウェブ層で水平にスケールします"),
            complexity: 2,
            evolves_to: vec!["pat-cached-tier".to_string()],
            evolves_from: vec![],
        }),
        KnowledgeEntry::Pattern(PatternEntry {
            id: "pat-cached-tier".to_string(),
            tags: vec!["architecture".to_string(), "caching".to_string()],
            trust: trust(0.85),
            name: LocalizedText::new("Cached three-tier", "キャッシュ付き三層"),
            description: LocalizedText::new(
                "Adds a cache between the web tier and the database",
                "ウェブ層とデータベースの間にキャッシュを追加します",
            ),
            required_components: vec![
                ComponentRequirement {
                    component: "web-server".to_string(),
                    min_count: 2,
                },
                ComponentRequirement {
                    component: "cache".to_string(),
                    min_count: 1,
                },
                ComponentRequirement {
                    component: "database".to_string(),
                    min_count: 1,
                },
            ],
            optional_components: vec![],
            scalability: LocalizedText::new("Read-heavy workloads scale with the cache", "読み取り中心の負荷はキャッシュでスケールします"),
            complexity: 3,
            evolves_to: vec![],
            evolves_from: vec!["pat-three-tier".to_string()],
        }),
        KnowledgeEntry::AntiPattern(AntiPatternEntry {
            id: "anti-single-web".to_string(),
            tags: vec!["availability".to_string()],
            trust: trust(0.85),
            name: LocalizedText::new("Single web server", "単一ウェブサーバー"),
            severity: Severity::Critical,
            problem: LocalizedText::new(
                "One web server is a single point of failure",
                "ウェブサーバーが1台だと単一障害点になります",
            ),
            impact: LocalizedText::new("Any restart takes the site down", "再起動のたびにサイトが停止します"),
            solution: LocalizedText::new("Run at least two behind a balancer", "バランサー配下で最低2台を稼働させます"),
            detector: Some(Detector::new(|spec: &ComponentSpec| {
                Ok(spec.component == "web-server" && spec.count < 2)
            })),
        }),
        KnowledgeEntry::AntiPattern(AntiPatternEntry {
            id: "anti-broken-detector".to_string(),
            tags: vec!["capacity".to_string()],
            trust: trust(0.6),
            name: LocalizedText::new("Unbounded connection pool", "無制限のコネクションプール"),
            severity: Severity::Medium,
            problem: LocalizedText::new("Pool growth is never capped", "プールの増加に上限がありません"),
            impact: LocalizedText::new("Database exhaustion under load", "高負荷時にデータベースが枯渇します"),
            solution: LocalizedText::new("Cap the pool and queue excess work", "プールに上限を設け超過分はキューに積みます"),
            detector: Some(Detector::new(|_spec: &ComponentSpec| {
                Err(KbError::Detector("metrics feed unavailable".to_string()))
            })),
        }),
        KnowledgeEntry::Failure(FailureEntry {
            id: "fail-db-down".to_string(),
            tags: vec!["reliability".to_string()],
            trust: trust(0.75),
            component: "database".to_string(),
            affected_components: vec!["web-server".to_string()],
            impact: FailureImpact::ServiceDown,
            likelihood: Likelihood::Medium,
            prevention: vec![
                LocalizedText::new("Run a hot standby replica", "ホットスタンバイのレプリカを用意します"),
                LocalizedText::new("Test failover quarterly", "四半期ごとにフェイルオーバーを試験します"),
            ],
            mitigation: vec![
                LocalizedText::new("Promote the replica", "レプリカを昇格させます"),
                LocalizedText::new("Serve cached reads while writes queue", "書き込みを待機させつつキャッシュから読み取りを返します"),
            ],
            recovery_time: LocalizedText::new("Minutes with automated failover", "自動フェイルオーバーなら数分"),
        }),
        KnowledgeEntry::QuickTip(QuickTipEntry {
            id: "tip-cache-ttl".to_string(),
            tags: vec!["caching".to_string()],
            trust: trust(0.6),
            component: "cache".to_string(),
            category: "tuning".to_string(),
            text: LocalizedText::new(
                "Set explicit TTLs so stale entries cannot pile up",
                "キャッシュには明示的なTTLを設定してください",
            ),
        }),
        KnowledgeEntry::Performance(PerformanceEntry {
            id: "perf-db".to_string(),
            tags: vec!["performance".to_string()],
            trust: trust(0.7),
            component: "database".to_string(),
            latency: RangeText {
                low: "5".to_string(),
                high: "50".to_string(),
                unit: "ms".to_string(),
            },
            throughput: RangeText {
                low: "1000".to_string(),
                high: "20000".to_string(),
                unit: "qps".to_string(),
            },
            scaling: LocalizedText::new(
                "Scale vertically first, then add read replicas",
                "まず垂直スケールし、その後リードレプリカを追加します",
            ),
            bottlenecks: vec!["disk iops".to_string(), "connection pool".to_string()],
        }),
    ]
}

fn engine() -> SearchEngine {
    let catalog = KnowledgeCatalog::new(fixture_entries(), component_types()).unwrap();
    SearchEngine::new(catalog)
}

// ==================== Free-text queries ====================

#[test]
fn test_empty_query_returns_nothing() {
    let engine = engine();
    assert!(engine.search("", &SearchOptions::default()).is_empty());
    assert!(engine.search("   \t ", &SearchOptions::default()).is_empty());
}

#[test]
fn test_empty_query_ignores_filters() {
    let engine = engine();
    let options = SearchOptions {
        components: vec!["database".to_string()],
        tags: vec!["performance".to_string()],
        ..Default::default()
    };
    assert!(engine.search("", &options).is_empty());
}

#[test]
fn test_results_sorted_and_normalized() {
    let engine = engine();
    let results = engine.search("load-balancer web-server", &SearchOptions::default());
    assert!(!results.is_empty());
    assert!((results[0].score - 1.0).abs() < 1e-9);
    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
    for result in &results {
        assert!(result.score > 0.0 && result.score <= 1.0);
    }
}

#[test]
fn test_exact_match_beats_partial_match() {
    let engine = engine();
    let results = engine.search("balancer", &SearchOptions::default());
    // "balancer" is a partial of "load-balancer"; entries naming the
    // balancer directly must still surface.
    assert!(results.iter().any(|r| r.entry.id() == "rel-lb-web"));
}

#[test]
fn test_enum_names_are_indexed() {
    let engine = engine();
    let results = engine.search("requires", &SearchOptions::default());
    let ids: Vec<&str> = results.iter().map(|r| r.entry.id()).collect();
    assert!(ids.contains(&"rel-lb-web"));
    assert!(ids.contains(&"rel-web-db"));

    let results = engine.search("service-down", &SearchOptions::default());
    assert!(results.iter().any(|r| r.entry.id() == "fail-db-down"));
}

#[test]
fn test_min_score_never_increases_result_count() {
    let engine = engine();
    let loose = engine.search(
        "cache database scaling",
        &SearchOptions {
            min_score: 0.1,
            ..Default::default()
        },
    );
    let strict = engine.search(
        "cache database scaling",
        &SearchOptions {
            min_score: 0.5,
            ..Default::default()
        },
    );
    assert!(strict.len() <= loose.len());
}

#[test]
fn test_limit_truncates() {
    let engine = engine();
    let results = engine.search(
        "database cache web-server",
        &SearchOptions {
            limit: 2,
            min_score: 0.0,
            ..Default::default()
        },
    );
    assert!(results.len() <= 2);
}

#[test]
fn test_kind_filter() {
    let engine = engine();
    let results = engine.search(
        "cache",
        &SearchOptions {
            kinds: vec![EntryKind::QuickTip],
            ..Default::default()
        },
    );
    assert!(!results.is_empty());
    for result in &results {
        assert_eq!(result.entry.kind(), EntryKind::QuickTip);
    }
}

#[test]
fn test_component_filter() {
    let engine = engine();
    let results = engine.search(
        "database",
        &SearchOptions {
            components: vec!["cache".to_string()],
            ..Default::default()
        },
    );
    for result in &results {
        assert!(result
            .entry
            .components()
            .iter()
            .any(|c| *c == "cache"));
    }
}

#[test]
fn test_component_and_tag_filters_intersect() {
    let engine = engine();
    let results = engine.search(
        "database",
        &SearchOptions {
            components: vec!["database".to_string()],
            tags: vec!["performance".to_string()],
            ..Default::default()
        },
    );
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].entry.id(), "perf-db");
}

#[test]
fn test_japanese_phrase_query() {
    let engine = engine();
    let results = engine.search("トラフィックを分散", &SearchOptions::default());
    assert!(!results.is_empty());
    assert_eq!(results[0].entry.id(), "rel-lb-web");
}

#[test]
fn test_japanese_fragment_query() {
    let engine = engine();
    // Two fragments that appear in different sentences of the same entry.
    let results = engine.search("キャッシュ TTL設定", &SearchOptions::default());
    assert!(results.iter().any(|r| r.entry.id() == "tip-cache-ttl"));
}

// ==================== Auxiliary lookups ====================

#[test]
fn test_by_component_sorted_by_confidence() {
    let engine = engine();
    let results = engine.by_component("database");
    let ids: Vec<&str> = results.iter().map(|r| r.entry.id()).collect();
    assert!(ids.contains(&"rel-web-db"));
    assert!(ids.contains(&"fail-db-down"));
    assert!(ids.contains(&"perf-db"));
    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
    for result in &results {
        assert!((result.score - result.entry.trust().confidence).abs() < 1e-9);
    }
}

#[test]
fn test_by_component_unknown_is_empty() {
    let engine = engine();
    assert!(engine.by_component("mainframe").is_empty());
}

#[test]
fn test_by_tag_is_case_insensitive() {
    let engine = engine();
    let results = engine.by_tag("SCALING");
    let ids: Vec<&str> = results.iter().map(|r| r.entry.id()).collect();
    assert!(ids.contains(&"rel-lb-web"));
    assert!(ids.contains(&"pat-three-tier"));
}

#[test]
fn test_related_excludes_self_and_sorts_by_overlap() {
    let engine = engine();
    let results = engine.related("rel-lb-web");
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r.entry.id() != "rel-lb-web"));
    // Shares two components plus the scaling tag.
    assert_eq!(results[0].entry.id(), "pat-three-tier");
    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
    for result in &results {
        assert!(result.score > 0.0 && result.score <= 1.0);
    }
}

#[test]
fn test_related_unknown_entry_is_empty() {
    let engine = engine();
    assert!(engine.related("no-such-entry").is_empty());
}

// ==================== Anti-pattern detection ====================

#[test]
fn test_detector_match() {
    let engine = engine();
    let spec = ComponentSpec {
        component: "web-server".to_string(),
        count: 1,
        attached: vec![],
    };
    let hits = engine.detect_anti_patterns(&spec);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "anti-single-web");
}

#[test]
fn test_detector_no_match() {
    let engine = engine();
    let spec = ComponentSpec {
        component: "web-server".to_string(),
        count: 3,
        attached: vec![],
    };
    assert!(engine.detect_anti_patterns(&spec).is_empty());
}

#[test]
fn test_failing_detector_does_not_abort_batch() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = engine();
    // anti-broken-detector always errors; the single-web detector must
    // still report.
    let spec = ComponentSpec {
        component: "web-server".to_string(),
        count: 1,
        attached: vec![],
    };
    let hits = engine.detect_anti_patterns(&spec);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "anti-single-web");
}

// ==================== Rebuild ====================

#[test]
fn test_replace_catalog_reindexes() {
    let mut engine = engine();
    assert!(!engine.search("cache", &SearchOptions::default()).is_empty());

    let replacement = KnowledgeCatalog::new(
        vec![relationship(
            "rel-only",
            "firewall",
            "web-server",
            RelationKind::Protects,
            &["security"],
            0.8,
            LocalizedText::new("shields the origin", "オリジンを保護します"),
        )],
        component_types(),
    )
    .unwrap();
    engine.replace_catalog(replacement);

    assert!(engine.search("cache", &SearchOptions::default()).is_empty());
    let results = engine.search("firewall", &SearchOptions::default());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].entry.id(), "rel-only");
}

#[test]
fn test_rebuild_preserves_results() {
    let mut engine = engine();
    let before: Vec<String> = engine
        .search("load-balancer", &SearchOptions::default())
        .iter()
        .map(|r| r.entry.id().to_string())
        .collect();
    engine.rebuild();
    let after: Vec<String> = engine
        .search("load-balancer", &SearchOptions::default())
        .iter()
        .map(|r| r.entry.id().to_string())
        .collect();
    assert_eq!(before, after);
}

// ==================== Catalogue validation ====================

#[test]
fn test_duplicate_id_rejected() {
    let mut entries = fixture_entries();
    entries.push(relationship(
        "rel-lb-web",
        "cdn",
        "cache",
        RelationKind::Protects,
        &["dup"],
        0.5,
        LocalizedText::new("duplicate", "重複"),
    ));
    let err = KnowledgeCatalog::new(entries, component_types()).unwrap_err();
    assert!(matches!(err, KbError::DuplicateEntryId(id) if id == "rel-lb-web"));
}

#[test]
fn test_unknown_component_rejected() {
    let mut entries = fixture_entries();
    entries.push(relationship(
        "rel-bad",
        "mainframe",
        "web-server",
        RelationKind::Requires,
        &["legacy"],
        0.5,
        LocalizedText::new("unknown component", "未知のコンポーネント"),
    ));
    let err = KnowledgeCatalog::new(entries, component_types()).unwrap_err();
    assert!(matches!(err, KbError::UnknownComponent { component, .. } if component == "mainframe"));
}

#[test]
fn test_unresolved_evolution_rejected() {
    let mut entries = fixture_entries();
    if let KnowledgeEntry::Pattern(p) = &mut entries[4] {
        p.evolves_to.push("pat-missing".to_string());
    }
    let err = KnowledgeCatalog::new(entries, component_types()).unwrap_err();
    assert!(matches!(err, KbError::UnresolvedEvolution { target, .. } if target == "pat-missing"));
}

#[test]
fn test_out_of_range_confidence_rejected() {
    // The constructor clamps, so an out-of-range value can only arrive
    // through a deserialized feed; mutate the field to simulate one.
    let mut entries = fixture_entries();
    let mut bad = relationship(
        "rel-overconfident",
        "cdn",
        "cache",
        RelationKind::Enhances,
        &["caching"],
        0.5,
        LocalizedText::new("too sure", "自信過剰"),
    );
    if let KnowledgeEntry::Relationship(r) = &mut bad {
        r.trust.confidence = 1.5;
    }
    entries.push(bad);
    let err = KnowledgeCatalog::new(entries, component_types()).unwrap_err();
    assert!(matches!(err, KbError::InvalidConfidence { .. }));
}

#[test]
fn test_empty_tags_rejected() {
    let mut entries = fixture_entries();
    entries.push(relationship(
        "rel-untagged",
        "cdn",
        "cache",
        RelationKind::Enhances,
        &[],
        0.5,
        LocalizedText::new("untagged", "タグなし"),
    ));
    let err = KnowledgeCatalog::new(entries, component_types()).unwrap_err();
    assert!(matches!(err, KbError::EmptyTags(id) if id == "rel-untagged"));
}

#[test]
fn test_thin_failure_guidance_rejected() {
    let mut entries = fixture_entries();
    if let KnowledgeEntry::Failure(f) = &mut entries[7] {
        f.prevention.truncate(1);
    }
    let err = KnowledgeCatalog::new(entries, component_types()).unwrap_err();
    assert!(matches!(
        err,
        KbError::TooFewGuidanceItems {
            field: "prevention",
            ..
        }
    ));
}

// ==================== Catalogue feed serialization ====================

#[test]
fn test_catalog_feed_round_trips_through_json() {
    let entries = fixture_entries();
    let json = serde_json::to_string(&entries).unwrap();
    let decoded: Vec<KnowledgeEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.len(), entries.len());
    for (original, roundtripped) in entries.iter().zip(&decoded) {
        assert_eq!(original.id(), roundtripped.id());
        assert_eq!(original.kind(), roundtripped.kind());
    }
    // Detectors are runtime-attached and are not part of the feed.
    let catalog = KnowledgeCatalog::new(decoded, component_types()).unwrap();
    assert_eq!(catalog.len(), entries.len());
}

#[test]
fn test_confidence_out_of_range_clamped_by_constructor() {
    let trust = TrustMetadata::new(7.0, vec![source(SourceKind::Standards)]);
    assert!((trust.confidence - 1.0).abs() < 1e-9);
}
