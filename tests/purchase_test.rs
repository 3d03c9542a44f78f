#[path = "common/mod.rs"]
mod common;

use common::{FakeApi, raffle};
use rifa::error::RifaError;
use rifa::grid::SelectionSet;
use rifa::purchase::{PurchaseRequest, submit_selection};
use rifa::types::RaffleStatus;

fn request(revalidate: bool) -> PurchaseRequest<'static> {
    PurchaseRequest {
        raffle_id: "r-1",
        user_id: "u-1",
        proof_url: "proof",
        revalidate,
    }
}

fn selection(api_raffle: &rifa::types::Raffle, numbers: &[usize]) -> SelectionSet {
    let mut selection = SelectionSet::new();
    for &n in numbers {
        selection.toggle(api_raffle, n);
    }
    selection
}

#[tokio::test]
async fn test_buys_in_selection_order() {
    let r = raffle("r-1", 100, &[]);
    let api = FakeApi::with_raffle(r.clone());
    let selected = selection(&r, &[42, 7, 13]);

    let tickets = submit_selection(&api, &request(false), &selected).await.unwrap();

    assert_eq!(api.buy_calls(), vec![42, 7, 13]);
    let numbers: Vec<usize> = tickets.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![42, 7, 13]);
    assert!(tickets.iter().all(|t| t.user_id == "u-1" && t.url_comprobante == "proof"));
}

#[tokio::test]
async fn test_failure_stops_the_batch_and_keeps_earlier_purchases() {
    let r = raffle("r-1", 100, &[]);
    let api = FakeApi::with_raffle(r.clone());
    api.fail_number(9);
    let selected = selection(&r, &[5, 9, 11]);

    let err = submit_selection(&api, &request(false), &selected)
        .await
        .unwrap_err();

    match err {
        RifaError::PurchaseAborted {
            purchased,
            failed,
            message,
        } => {
            assert_eq!(purchased, vec![5]);
            assert_eq!(failed, 9);
            assert!(message.contains("already sold"), "got: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    // 11 is never attempted
    assert_eq!(api.buy_calls(), vec![5, 9]);
    // The selection is untouched
    assert_eq!(selected.numbers(), &[5, 9, 11]);
}

#[tokio::test]
async fn test_empty_selection_submits_nothing() {
    let api = FakeApi::with_raffle(raffle("r-1", 100, &[]));

    let tickets = submit_selection(&api, &request(false), &SelectionSet::new())
        .await
        .unwrap();

    assert!(tickets.is_empty());
    assert!(api.buy_calls().is_empty());
}

#[tokio::test]
async fn test_revalidate_rejects_numbers_sold_meanwhile() {
    let r = raffle("r-1", 100, &[]);
    let api = FakeApi::with_raffle(r.clone());
    let selected = selection(&r, &[3, 4, 5]);
    api.sell("r-1", 4);

    let err = submit_selection(&api, &request(true), &selected)
        .await
        .unwrap_err();

    assert!(matches!(err, RifaError::StaleSelection(ref n) if n == &vec![4]));
    assert!(api.buy_calls().is_empty());
}

#[tokio::test]
async fn test_revalidate_rejects_closed_raffle() {
    let r = raffle("r-1", 100, &[]);
    let api = FakeApi::with_raffle(r.clone());
    let selected = selection(&r, &[3]);
    api.set_status("r-1", RaffleStatus::Closed);

    let err = submit_selection(&api, &request(true), &selected)
        .await
        .unwrap_err();

    assert!(matches!(err, RifaError::RaffleNotActive(_)));
    assert!(api.buy_calls().is_empty());
}

#[tokio::test]
async fn test_without_revalidation_the_raffle_is_not_fetched() {
    let r = raffle("r-1", 100, &[]);
    let api = FakeApi::with_raffle(r.clone());
    let selected = selection(&r, &[1]);

    submit_selection(&api, &request(false), &selected).await.unwrap();

    assert_eq!(api.get_calls(), 0);
}
