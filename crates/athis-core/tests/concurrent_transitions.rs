use std::sync::Arc;

use anyhow::Result;
use athis_core::app::{AppBuilder, AthisApi};
use athis_core::domain::{
    AthisError, DemandEvent, DemandKind, DemandStatus, GeoPoint, NewDemand, Requester,
};
use athis_core::impls::{InMemoryDemandStore, RecordingEventSink};

fn request() -> NewDemand {
    NewDemand {
        kind: DemandKind::HousingImprovement,
        description: "reforma".to_string(),
        address: String::new(),
        location: GeoPoint::new(-19.7492, -47.9292),
        requester: Requester::named("Ana Costa"),
    }
}

fn api(events: &RecordingEventSink) -> Result<Arc<AthisApi>> {
    Ok(Arc::new(
        AppBuilder::new()
            .store(Arc::new(InMemoryDemandStore::new()))
            .event_sink(Arc::new(events.clone()))
            .build()?,
    ))
}

/// 同じ id への Approved / Rejected の競合: 勝者はちょうど 1 つ
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_terminal_transitions_have_one_winner() -> Result<()> {
    for _ in 0..20 {
        let events = RecordingEventSink::new();
        let api = api(&events)?;
        let id = api.create_demand(request()).await?.id().to_string();

        let approve = tokio::spawn({
            let api = Arc::clone(&api);
            let id = id.clone();
            async move { api.set_demand_status(&id, DemandStatus::Approved).await }
        });
        let reject = tokio::spawn({
            let api = Arc::clone(&api);
            let id = id.clone();
            async move { api.set_demand_status(&id, DemandStatus::Rejected).await }
        });
        let results = [approve.await?, reject.await?];

        let winners: Vec<DemandStatus> = results
            .iter()
            .filter_map(|r| r.as_ref().ok().map(|d| d.status()))
            .collect();
        assert_eq!(winners.len(), 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| matches!(e, AthisError::InvalidTransition { .. }))
        );

        // stored state is the winner's, never overwritten
        assert_eq!(api.get_demand(&id).await?.status(), winners[0]);
        let changes = events
            .events()
            .iter()
            .filter(|e| matches!(e, DemandEvent::StatusChanged { .. }))
            .count();
        assert_eq!(changes, 1);
    }
    Ok(())
}

/// 同じ遷移を多数同時に要求しても 1 回しか成功しない
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_review_requests_apply_once() -> Result<()> {
    let events = RecordingEventSink::new();
    let api = api(&events)?;
    let id = api.create_demand(request()).await?.id().to_string();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let api = Arc::clone(&api);
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            api.set_demand_status(&id, DemandStatus::UnderReview).await
        }));
    }
    let mut ok = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => ok += 1,
            Err(err) => assert!(matches!(err, AthisError::InvalidTransition { .. })),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(
        api.get_demand(&id).await?.status(),
        DemandStatus::UnderReview
    );
    Ok(())
}

/// 異なる id への遷移は互いに干渉しない
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_ids_all_succeed() -> Result<()> {
    let events = RecordingEventSink::new();
    let api = api(&events)?;
    let mut ids = Vec::new();
    for _ in 0..10 {
        ids.push(api.create_demand(request()).await?.id().to_string());
    }

    let mut handles = Vec::new();
    for id in ids.clone() {
        let api = Arc::clone(&api);
        handles.push(tokio::spawn(async move {
            api.set_demand_status(&id, DemandStatus::Approved).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let approved = api.list_demands(Some(DemandStatus::Approved)).await?;
    assert_eq!(approved.len(), ids.len());
    Ok(())
}
