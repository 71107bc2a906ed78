use super::*;
use rstest::rstest;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page(), 1);
    assert_eq!(request.per_page(), 20);
    assert_eq!(request.offset(), 0);
}

#[rstest]
#[case(1, 20, 0)]
#[case(2, 20, 20)]
#[case(3, 50, 100)]
#[case(0, 10, 0)]
fn test_offset(#[case] page: u32, #[case] per_page: u32, #[case] offset: u64) {
    let request = PageRequest { page, per_page };
    assert_eq!(request.offset(), offset);
}

#[test]
fn test_per_page_is_clamped() {
    let request = PageRequest {
        page: 1,
        per_page: 5_000,
    };
    assert_eq!(request.limit(), u64::from(MAX_PER_PAGE));

    let request = PageRequest {
        page: 1,
        per_page: 0,
    };
    assert_eq!(request.limit(), 1);
}

#[rstest]
#[case(0, 1)]
#[case(3, 1)]
#[case(25, 3)]
#[case(30, 3)]
fn test_total_pages(#[case] total: u64, #[case] pages: u32) {
    let response: PageResponse<i32> = PageResponse::new(vec![], &PageRequest {
        page: 1,
        per_page: 10,
    }, total);
    assert_eq!(response.meta.total_pages, pages);
}

#[test]
fn test_map_keeps_meta() {
    let response = PageResponse::new(vec![1, 2, 3], &PageRequest::default(), 3);
    let mapped = response.map(|n| n * 10);
    assert_eq!(mapped.data, vec![10, 20, 30]);
    assert_eq!(mapped.meta.total, 3);
}
