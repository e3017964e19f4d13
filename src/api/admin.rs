//! Maintenance endpoints: seeding, slot regeneration, debugging and subscriber reports

use crate::api::consultations::schemas::{Coach, Consultation, TimeSlot};
use crate::api::error::ApiError;
use crate::core::traits::{LeadService, SchedulingService};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use di_axum::Inject;
use serde_json::{Value, json};
use std::collections::BTreeMap;

pub fn router() -> Router {
    Router::new()
        .route("/init-db", post(init_db))
        .route("/fix-time-slots", post(fix_time_slots))
        .route("/debug-scheduling", get(debug_scheduling))
        .route("/admin/subscribers", get(list_subscribers))
        .route("/admin/subscribers/stats", get(subscriber_stats))
}

async fn init_db(
    Inject(scheduling): Inject<dyn SchedulingService>,
) -> Result<Json<Value>, ApiError> {
    let report = scheduling
        .initialize(Utc::now().date_naive())
        .await
        .map_err(|e| ApiError::internal("Failed to initialize database", e))?;

    Ok(Json(json!({
        "success": true,
        "message": "Database initialized successfully!",
        "coaches": report.coaches.len(),
        "timeSlots": report.inserted_slots,
    })))
}

async fn fix_time_slots(
    Inject(scheduling): Inject<dyn SchedulingService>,
) -> Result<Json<Value>, ApiError> {
    let report = scheduling
        .regenerate_slots(Utc::now().date_naive())
        .await
        .map_err(|e| ApiError::internal("Internal server error", e))?;

    let coaches_found: Vec<Value> = report
        .coaches
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();

    Ok(Json(json!({
        "success": true,
        "message": "Time slots regenerated successfully!",
        "coaches": report.coaches.len(),
        "timeSlots": report.inserted_slots,
        "details": {
            "coachesFound": coaches_found,
            "totalSlotsCreated": report.inserted_slots,
        },
    })))
}

async fn debug_scheduling(
    Inject(scheduling): Inject<dyn SchedulingService>,
) -> Result<Json<Value>, ApiError> {
    let snapshot = scheduling.snapshot().await?;

    let mut slots_by_coach: BTreeMap<String, Vec<TimeSlot>> = BTreeMap::new();
    for slot in snapshot.time_slots.iter().cloned() {
        slots_by_coach
            .entry(slot.coach_id.to_string())
            .or_default()
            .push(slot.into());
    }

    let summary = json!({
        "totalCoaches": snapshot.coaches.len(),
        "totalTimeSlots": snapshot.time_slots.len(),
        "totalConsultations": snapshot.consultations.len(),
        "coachesWithSlots": slots_by_coach.len(),
    });

    let coaches: Vec<Coach> = snapshot.coaches.into_iter().map(Coach::from).collect();
    let time_slots: Vec<TimeSlot> = snapshot.time_slots.into_iter().map(TimeSlot::from).collect();
    let consultations: Vec<Consultation> = snapshot
        .consultations
        .into_iter()
        .map(Consultation::from)
        .collect();

    Ok(Json(json!({
        "coaches": coaches,
        "timeSlots": time_slots,
        "slotsByCoach": slots_by_coach,
        "consultations": consultations,
        "summary": summary,
    })))
}

async fn list_subscribers(
    Inject(leads): Inject<dyn LeadService>,
) -> Result<Json<Value>, ApiError> {
    let subscribers = leads.list_subscribers().await?;
    Ok(Json(json!({ "success": true, "data": subscribers })))
}

async fn subscriber_stats(
    Inject(leads): Inject<dyn LeadService>,
) -> Result<Json<Value>, ApiError> {
    let stats = leads.subscriber_stats().await?;
    Ok(Json(json!({
        "success": true,
        "data": stats.by_cookbook,
        "total": stats.total,
    })))
}
