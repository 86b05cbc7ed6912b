use bangumi_lib::{
    fetch_ranking, Category, Client, RankedRequest, RankingFilters, RetrievalError, UNRANKED,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn subjects(start: i64, count: i64, ranked: bool) -> Vec<Value> {
    (start..start + count)
        .map(|id| {
            json!({
                "id": id,
                "type": 2,
                "name": format!("subject {}", id),
                "date": "2020-01-01",
                "rating": {"rank": if ranked { id } else { 0 }, "total": 10, "score": 7.0}
            })
        })
        .collect()
}

fn page(data: Vec<Value>, total: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": data,
        "total": total,
        "limit": 50,
        "offset": 0
    }))
}

#[tokio::test]
async fn browse_stops_on_short_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "50"))
        .respond_with(page(subjects(1, 50, true), 70))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("offset", "50"))
        .and(query_param("limit", "50"))
        .respond_with(page(subjects(51, 20, true), 70))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let request = RankedRequest::new(Category::Anime, 120);
    let rows = fetch_ranking(&client, &request).await.unwrap();

    assert_eq!(rows.len(), 70);
    assert_eq!(rows.first().unwrap().id, 1);
    assert_eq!(rows.last().unwrap().id, 70);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn browse_stops_on_empty_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("offset", "0"))
        .respond_with(page(subjects(1, 50, true), 50))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("offset", "50"))
        .respond_with(page(vec![], 50))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let rows = fetch_ranking(&client, &RankedRequest::new(Category::Anime, 200))
        .await
        .unwrap();
    assert_eq!(rows.len(), 50);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn browse_requests_only_what_is_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("type", "4"))
        .and(query_param("sort", "rank"))
        .and(query_param("limit", "30"))
        .respond_with(page(subjects(1, 30, true), 5000))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let rows = fetch_ranking(&client, &RankedRequest::new(Category::Game, 30))
        .await
        .unwrap();
    assert_eq!(rows.len(), 30);
}

#[tokio::test]
async fn browse_drops_unranked_and_keeps_paging() {
    let mock_server = MockServer::start().await;

    let mut first = subjects(1, 40, true);
    first.extend(subjects(41, 10, false));
    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "50"))
        .respond_with(page(first, 1000))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("offset", "50"))
        .and(query_param("limit", "10"))
        .respond_with(page(subjects(51, 10, true), 1000))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let rows = fetch_ranking(&client, &RankedRequest::new(Category::Anime, 50))
        .await
        .unwrap();
    assert_eq!(rows.len(), 50);
    assert!(rows.iter().all(|r| r.rank != UNRANKED));
    assert_eq!(rows.last().unwrap().id, 60);
}

#[tokio::test]
async fn page_under_fifty_ends_fetch_even_when_full() {
    let mock_server = MockServer::start().await;

    let mut first = subjects(1, 45, true);
    first.extend(subjects(46, 5, false));
    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "50"))
        .respond_with(page(first, 1000))
        .expect(1)
        .mount(&mock_server)
        .await;
    let mut second = subjects(51, 14, true);
    second.extend(subjects(65, 1, false));
    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("offset", "50"))
        .and(query_param("limit", "15"))
        .respond_with(page(second, 1000))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let rows = fetch_ranking(&client, &RankedRequest::new(Category::Anime, 60))
        .await
        .unwrap();

    // 15 items is below the page cap, so no third request is made.
    assert_eq!(rows.len(), 59);
    assert_eq!(rows.last().unwrap().id, 64);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn filters_route_to_search_and_keep_unranked() {
    let mock_server = MockServer::start().await;

    let mut data = subjects(1, 3, true);
    data.extend(subjects(4, 2, false));
    Mock::given(method("POST"))
        .and(path("/v0/search/subjects"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "0"))
        .and(body_partial_json(json!({
            "sort": "rank",
            "filter": {
                "type": [2],
                "air_date": [">=2020-01-01", "<=2024-12-31"],
                "rating": [">=6"],
                "rating_count": [">=100"],
                "meta_tags": ["原创"]
            }
        })))
        .respond_with(page(data, 5))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let filters = RankingFilters {
        air_date: vec![">=2020-01-01".to_string(), "<=2024-12-31".to_string()],
        rating_min: Some(6.0),
        rating_max: None,
        rating_count_min: Some(100),
        meta_tags: vec!["原创".to_string()],
        keyword: None,
    };
    let request = RankedRequest::new(Category::Anime, 100).with_filters(filters);
    let rows = fetch_ranking(&client, &request).await.unwrap();

    assert_eq!(rows.len(), 5);
    assert_eq!(rows.iter().filter(|r| r.rank == UNRANKED).count(), 2);

    let view = request.apply_view(rows);
    assert_eq!(view.len(), 3);
}

#[tokio::test]
async fn keyword_alone_routes_to_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0/search/subjects"))
        .and(body_partial_json(json!({
            "keyword": "bebop",
            "sort": "rank",
            "filter": {"type": [2]}
        })))
        .respond_with(page(subjects(1, 2, true), 2))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let filters = RankingFilters {
        keyword: Some(" bebop ".to_string()),
        ..RankingFilters::default()
    };
    let request = RankedRequest::new(Category::Anime, 10).with_filters(filters);
    let rows = fetch_ranking(&client, &request).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn transport_failure_discards_partial_rows() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("offset", "0"))
        .respond_with(page(subjects(1, 50, true), 500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/subjects"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = fetch_ranking(&client, &RankedRequest::new(Category::Anime, 100))
        .await
        .unwrap_err();
    match err {
        RetrievalError::Transport(e) => assert_eq!(e.status(), Some(503)),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn zero_target_makes_no_requests() {
    let mock_server = MockServer::start().await;
    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let rows = fetch_ranking(&client, &RankedRequest::new(Category::Anime, 0))
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
