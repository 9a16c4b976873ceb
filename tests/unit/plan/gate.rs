use super::*;

const PLAN_NAMES: [&str; 9] = [
    "basic",
    "Basic",
    "professional",
    "enterprise",
    "ai_caption",
    "AI Caption",
    "free",
    "trial",
    "",
];

#[test]
fn is_allowed_matches_level_comparison_for_every_pair() {
    for plan in PLAN_NAMES {
        for tier in QualityTier::ALL {
            assert_eq!(
                is_allowed(plan, tier),
                tier.level() <= max_quality(plan).level(),
                "plan={plan:?} tier={tier}"
            );
            assert_eq!(authorize(plan, tier).is_ok(), is_allowed(plan, tier));
        }
    }
}

#[test]
fn unknown_plans_resolve_to_sd() {
    assert_eq!(max_quality("free"), QualityTier::Sd);
    assert_eq!(max_quality("trial"), QualityTier::Sd);
    assert_eq!(max_quality("no-such-plan"), QualityTier::Sd);
    assert!(is_allowed("free", QualityTier::Sd));
    assert!(!is_allowed("free", QualityTier::Hd));
}

#[test]
fn plan_table_maps_to_expected_tiers() {
    assert_eq!(max_quality("Basic"), QualityTier::Sd);
    assert_eq!(max_quality("Professional"), QualityTier::Hd);
    assert_eq!(max_quality("Enterprise"), QualityTier::FullHd);
    assert_eq!(max_quality("ai_caption"), QualityTier::UltraHd);
}

#[test]
fn basic_plan_requesting_4k_names_sd() {
    let err = authorize("Basic", QualityTier::UltraHd).unwrap_err();
    match err {
        RenderError::Authorization {
            requested,
            max_allowed,
            ..
        } => {
            assert_eq!(requested, QualityTier::UltraHd);
            assert_eq!(max_allowed, QualityTier::Sd);
        }
        other => panic!("expected authorization error, got {other:?}"),
    }
}

#[test]
fn tier_parsing_uses_wire_names() {
    assert_eq!("sd".parse::<QualityTier>().unwrap(), QualityTier::Sd);
    assert_eq!("FullHD".parse::<QualityTier>().unwrap(), QualityTier::FullHd);
    assert_eq!("4k".parse::<QualityTier>().unwrap(), QualityTier::UltraHd);
    assert!(matches!(
        "8k".parse::<QualityTier>(),
        Err(RenderError::Validation(_))
    ));
    assert_eq!(
        serde_json::to_string(&QualityTier::UltraHd).unwrap(),
        "\"4k\""
    );
    let levels: Vec<u8> = QualityTier::ALL.iter().map(|t| t.level()).collect();
    assert_eq!(levels, vec![1, 2, 3, 4]);
}
