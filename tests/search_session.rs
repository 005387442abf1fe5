mod common;

use common::{ids, recipes, upstream_error, ScriptedCatalog};
use recipe_scout::filter::{CanonicalQuery, FacetFamily};
use recipe_scout::session::{CommitOutcome, SearchSession, SearchStatus};

fn pasta() -> CanonicalQuery {
    CanonicalQuery::new("pasta")
}

fn vegan_pasta() -> CanonicalQuery {
    pasta().with_option(FacetFamily::Dietary, "vegan")
}

#[tokio::test]
async fn new_session_is_idle() {
    let catalog = ScriptedCatalog::new();
    let session = SearchSession::new(catalog.clone());

    let state = session.state();
    assert_eq!(state.status, SearchStatus::Idle);
    assert!(state.results.is_empty());
    assert_eq!(catalog.call_count(), 0);
}

#[tokio::test]
async fn start_fetches_and_becomes_ready() {
    let catalog = ScriptedCatalog::new();
    catalog.respond(Ok(recipes("p", 3)));
    let session = SearchSession::new(catalog.clone());

    let outcome = session.start(pasta()).await;

    assert_eq!(outcome, CommitOutcome::Applied);
    let state = session.state();
    assert_eq!(state.status, SearchStatus::Ready);
    assert_eq!(state.committed_query, pasta());
    assert_eq!(ids(&state.results), vec!["p0", "p1", "p2"]);
    assert_eq!(catalog.calls(), vec![pasta()]);
}

#[tokio::test]
async fn equal_commit_issues_no_fetch() {
    let catalog = ScriptedCatalog::new();
    catalog.respond(Ok(recipes("p", 2)));
    let session = SearchSession::new(catalog.clone());
    let initial = vegan_pasta().with_option(FacetFamily::Cuisine, "Italian");
    session.start(initial).await;

    let reordered = CanonicalQuery::new("  PASTA ")
        .with_option(FacetFamily::Cuisine, "Italian")
        .with_option(FacetFamily::Dietary, "vegan");
    let outcome = session.commit(reordered).await;

    assert_eq!(outcome, CommitOutcome::Unchanged);
    assert_eq!(catalog.call_count(), 1);
    assert_eq!(session.state().status, SearchStatus::Ready);
}

#[tokio::test]
async fn changed_commit_fetches_once() {
    let catalog = ScriptedCatalog::new();
    catalog.respond(Ok(recipes("p", 2)));
    catalog.respond(Ok(recipes("v", 1)));
    let session = SearchSession::new(catalog.clone());
    session.start(pasta()).await;

    let outcome = session.commit(vegan_pasta()).await;

    assert_eq!(outcome, CommitOutcome::Applied);
    assert_eq!(catalog.calls(), vec![pasta(), vegan_pasta()]);
    assert_eq!(ids(&session.state().results), vec!["v0"]);
}

#[tokio::test]
async fn newer_commit_wins_when_older_fetch_finishes_last() {
    let catalog = ScriptedCatalog::new();
    let first = catalog.gate();
    let second = catalog.gate();
    let session = SearchSession::new(catalog.clone());

    let s1 = session.clone();
    let pasta_task = tokio::spawn(async move { s1.start(pasta()).await });
    catalog.wait_for_calls(1).await;

    let s2 = session.clone();
    let vegan_task = tokio::spawn(async move { s2.commit(vegan_pasta()).await });
    catalog.wait_for_calls(2).await;

    second.send(Ok(recipes("v", 2))).unwrap();
    assert_eq!(vegan_task.await.unwrap(), CommitOutcome::Applied);

    first.send(Ok(recipes("p", 5))).unwrap();
    assert_eq!(pasta_task.await.unwrap(), CommitOutcome::Superseded);

    let state = session.state();
    assert_eq!(state.status, SearchStatus::Ready);
    assert_eq!(state.committed_query, vegan_pasta());
    assert_eq!(ids(&state.results), vec!["v0", "v1"]);
}

#[tokio::test]
async fn stale_response_arriving_first_is_discarded() {
    let catalog = ScriptedCatalog::new();
    let first = catalog.gate();
    let second = catalog.gate();
    let session = SearchSession::new(catalog.clone());

    let s1 = session.clone();
    let pasta_task = tokio::spawn(async move { s1.start(pasta()).await });
    catalog.wait_for_calls(1).await;

    let s2 = session.clone();
    let vegan_task = tokio::spawn(async move { s2.commit(vegan_pasta()).await });
    catalog.wait_for_calls(2).await;

    first.send(Ok(recipes("p", 5))).unwrap();
    assert_eq!(pasta_task.await.unwrap(), CommitOutcome::Superseded);

    let state = session.state();
    assert_eq!(state.status, SearchStatus::Loading);
    assert!(state.results.is_empty());

    second.send(Ok(recipes("v", 1))).unwrap();
    assert_eq!(vegan_task.await.unwrap(), CommitOutcome::Applied);
    assert_eq!(ids(&session.state().results), vec!["v0"]);
}

#[tokio::test]
async fn stale_failure_does_not_overwrite_newer_results() {
    let catalog = ScriptedCatalog::new();
    let first = catalog.gate();
    catalog.respond(Ok(recipes("v", 1)));
    let session = SearchSession::new(catalog.clone());

    let s1 = session.clone();
    let pasta_task = tokio::spawn(async move { s1.start(pasta()).await });
    catalog.wait_for_calls(1).await;

    assert_eq!(session.commit(vegan_pasta()).await, CommitOutcome::Applied);

    first.send(Err(upstream_error())).unwrap();
    assert_eq!(pasta_task.await.unwrap(), CommitOutcome::Superseded);

    let state = session.state();
    assert_eq!(state.status, SearchStatus::Ready);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn failure_is_reported_and_retry_refetches() {
    let catalog = ScriptedCatalog::new();
    catalog.respond(Err(upstream_error()));
    catalog.respond(Ok(recipes("p", 1)));
    let session = SearchSession::new(catalog.clone());

    session.start(pasta()).await;
    let state = session.state();
    assert_eq!(state.status, SearchStatus::Failed);
    let error = state.error.unwrap();
    assert_eq!(error.kind, "upstream_error");
    assert!(error.message.contains("503"));

    let outcome = session.commit(pasta()).await;
    assert_eq!(outcome, CommitOutcome::Applied);
    assert_eq!(catalog.call_count(), 2);

    let state = session.state();
    assert_eq!(state.status, SearchStatus::Ready);
    assert!(state.error.is_none());
    assert_eq!(ids(&state.results), vec!["p0"]);
}

#[tokio::test]
async fn empty_result_is_ready_not_failed() {
    let catalog = ScriptedCatalog::new();
    catalog.respond(Ok(Vec::new()));
    let session = SearchSession::new(catalog.clone());

    session.start(CanonicalQuery::new("zzzz")).await;

    let state = session.state();
    assert_eq!(state.status, SearchStatus::Ready);
    assert!(state.has_no_results());
    assert!(state.error.is_none());
}

#[tokio::test]
async fn previous_results_stay_visible_while_loading() {
    let catalog = ScriptedCatalog::new();
    catalog.respond(Ok(recipes("p", 2)));
    let gate = catalog.gate();
    let session = SearchSession::new(catalog.clone());
    session.start(pasta()).await;

    let s = session.clone();
    let task = tokio::spawn(async move { s.commit(vegan_pasta()).await });
    catalog.wait_for_calls(2).await;

    let state = session.state();
    assert!(state.is_loading());
    assert_eq!(state.committed_query, vegan_pasta());
    assert_eq!(ids(&state.results), vec!["p0", "p1"]);

    gate.send(Ok(recipes("v", 1))).unwrap();
    task.await.unwrap();
    assert_eq!(ids(&session.state().results), vec!["v0"]);
}

#[tokio::test]
async fn recommitting_in_flight_query_does_not_refetch() {
    let catalog = ScriptedCatalog::new();
    let gate = catalog.gate();
    let session = SearchSession::new(catalog.clone());

    let s = session.clone();
    let task = tokio::spawn(async move { s.start(pasta()).await });
    catalog.wait_for_calls(1).await;

    assert_eq!(session.commit(pasta()).await, CommitOutcome::Unchanged);
    assert_eq!(catalog.call_count(), 1);

    gate.send(Ok(recipes("p", 1))).unwrap();
    assert_eq!(task.await.unwrap(), CommitOutcome::Applied);
}

#[tokio::test]
async fn subscribers_observe_loading_then_ready() {
    let catalog = ScriptedCatalog::new();
    let gate = catalog.gate();
    let session = SearchSession::new(catalog.clone());
    let mut rx = session.subscribe();

    let s = session.clone();
    let task = tokio::spawn(async move { s.start(pasta()).await });
    catalog.wait_for_calls(1).await;

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().status, SearchStatus::Loading);

    gate.send(Ok(recipes("p", 1))).unwrap();
    task.await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().status, SearchStatus::Ready);
}
