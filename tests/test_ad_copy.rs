use rust_ads::ads::copywriter::{
    fallback_ad_copy, generate_or_fallback, validate_ad_copy, AdCopy, DESCRIPTION_COUNT,
    HEADLINE_COUNT, MAX_DESCRIPTION_LEN, MAX_HEADLINE_LEN,
};
use rust_ads::ads::platform::campaigns::{bounded_ad_copy, MAX_AD_DESCRIPTIONS, MAX_AD_HEADLINES};

/// 兜底文案必须随时可用: 数量精确、长度不超限
#[test]
fn test_fallback_is_always_valid() {
    let copy = fallback_ad_copy();
    validate_ad_copy(&copy).expect("fallback ad copy must validate");
    assert_eq!(copy.headlines.len(), HEADLINE_COUNT);
    assert_eq!(copy.descriptions.len(), DESCRIPTION_COUNT);
    for headline in &copy.headlines {
        assert!(
            headline.chars().count() <= MAX_HEADLINE_LEN,
            "headline too long: {:?}",
            headline
        );
    }
    for description in &copy.descriptions {
        assert!(
            description.chars().count() <= MAX_DESCRIPTION_LEN,
            "description too long: {:?}",
            description
        );
    }
}

#[test]
fn test_validate_rejects_wrong_counts() {
    let mut copy = fallback_ad_copy();
    copy.headlines.pop();
    assert!(validate_ad_copy(&copy).is_err());

    let mut copy = fallback_ad_copy();
    copy.descriptions.push("extra".to_string());
    assert!(validate_ad_copy(&copy).is_err());
}

#[test]
fn test_validate_rejects_overlong_and_empty() {
    let mut copy = fallback_ad_copy();
    copy.headlines[0] = "x".repeat(MAX_HEADLINE_LEN + 1);
    assert!(validate_ad_copy(&copy).is_err());

    let mut copy = fallback_ad_copy();
    copy.descriptions[0] = String::new();
    assert!(validate_ad_copy(&copy).is_err());
}

/// 文案服务未配置时透明回退, 活动创建不被它卡住
#[tokio::test]
async fn test_generate_or_fallback_without_client() {
    let copy = generate_or_fallback(None).await;
    validate_ad_copy(&copy).expect("fallback path must yield valid copy");
}

/// 响应式广告的平台上限截断
#[test]
fn test_platform_bounds() {
    let copy = AdCopy {
        headlines: (0..30).map(|i| format!("headline {}", i)).collect(),
        descriptions: (0..10).map(|i| format!("description {}", i)).collect(),
    };
    let (headlines, descriptions) = bounded_ad_copy(&copy);
    assert_eq!(headlines.len(), MAX_AD_HEADLINES);
    assert_eq!(descriptions.len(), MAX_AD_DESCRIPTIONS);

    // 兜底文案本身在上限以内, 不会被截断
    let copy = fallback_ad_copy();
    let (headlines, descriptions) = bounded_ad_copy(&copy);
    assert_eq!(headlines.len(), HEADLINE_COUNT);
    assert_eq!(descriptions.len(), DESCRIPTION_COUNT);
}
