//! Implementations for the service the app needs.
//!

use crate::core::availability::{self, AvailableSlot, CoachSelection};
use crate::core::booking::BookingRequest;
use crate::core::cookbooks;
use crate::core::email::{self, ConsultationNotice};
use crate::core::errors::ServiceError;
use crate::core::seeder::{self, SEED_BATCH_SIZE};
use crate::core::traits::{
    CookbookRequest, LeadService, NotificationService, SchedulingService, SchedulingSnapshot,
    SeedReport,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::entities::{Coach, Consultation, Subscriber, TimeSlot};
use crate::infrastructure::mailer::EmailReceipt;
use crate::infrastructure::subscribers::{DEFAULT_SOURCE, NewSubscriber, SubscriberStats};
use crate::infrastructure::traits::{Mailer, SchedulingRepository, SubscriberStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use di::{Ref, injectable};
use log::{debug, error, info, warn};
use uuid::Uuid;

#[injectable(SchedulingService)]
pub struct MySchedulingService {
    repo: Ref<dyn SchedulingRepository>,
    notifications: Ref<dyn NotificationService>,
}

impl MySchedulingService {
    async fn open_slots(&self, coach_id: Uuid, date: NaiveDate) -> Result<Vec<TimeSlot>, ServiceError> {
        let slots = self.repo.list_open_slots(coach_id, date).await?;
        let booked = self.repo.list_booked_times(coach_id, date).await?;

        debug!(
            "coach {coach_id} on {date}: {} seeded slots, {} booked",
            slots.len(),
            booked.len()
        );

        Ok(availability::subtract_booked(slots, &booked))
    }

    /// Generates slots for `coaches` and writes them batch by batch; a failed batch is logged
    /// and skipped.
    async fn seed_slots(&self, coaches: &[Coach], today: NaiveDate) -> SeedReport {
        let coach_ids: Vec<Uuid> = coaches.iter().map(|c| c.id).collect();
        let slots = seeder::generate_slots(&coach_ids, today);

        let mut inserted_slots = 0;
        for (index, batch) in slots.chunks(SEED_BATCH_SIZE).enumerate() {
            match self.repo.insert_slots(batch).await {
                Ok(inserted) => inserted_slots += inserted,
                Err(e) => error!("Error inserting time slots batch {}: {e}", index + 1),
            }
        }

        info!(
            "generated {} time slots for {} coaches, {inserted_slots} new",
            slots.len(),
            coaches.len()
        );

        SeedReport {
            coaches: coaches.iter().map(|c| (c.id, c.name.clone())).collect(),
            inserted_slots,
        }
    }
}

#[async_trait]
impl SchedulingService for MySchedulingService {
    async fn list_coaches(&self) -> Result<Vec<Coach>, ServiceError> {
        Ok(self.repo.list_coaches(true).await?)
    }

    async fn available_slots(
        &self,
        selection: CoachSelection,
        date: NaiveDate,
    ) -> Result<Vec<AvailableSlot>, ServiceError> {
        match selection {
            CoachSelection::Coach(coach_id) => {
                let coach = self.repo.find_coach(coach_id).await?;
                if coach.is_none() {
                    warn!("availability requested for unknown coach {coach_id}");
                }

                Ok(self
                    .open_slots(coach_id, date)
                    .await?
                    .into_iter()
                    .map(|slot| AvailableSlot::new(slot, coach.as_ref()))
                    .collect())
            }
            CoachSelection::NoPreference => {
                let mut all_slots = Vec::new();
                for coach in self.repo.list_coaches(true).await? {
                    let slots = self.open_slots(coach.id, date).await?;
                    all_slots.extend(
                        slots
                            .into_iter()
                            .map(|slot| AvailableSlot::new(slot, Some(&coach))),
                    );
                }

                Ok(availability::merge_no_preference(all_slots))
            }
        }
    }

    async fn book_consultation(&self, request: BookingRequest) -> Result<Consultation, ServiceError> {
        let consultation = request.into_consultation()?;

        info!(
            "booking consultation for {} on {} at {} (coach {:?})",
            consultation.client_email,
            consultation.consultation_date,
            consultation.consultation_time,
            consultation.coach_id
        );

        let consultation = self.repo.create_consultation(consultation).await?;

        if let Err(e) = self
            .notifications
            .send_consultation_confirmation(&ConsultationNotice::from(&consultation))
            .await
        {
            warn!("confirmation email for consultation {} failed: {e}", consultation.id);
        }

        Ok(consultation)
    }

    async fn initialize(&self, today: NaiveDate) -> Result<SeedReport, ServiceError> {
        if self.repo.count_coaches().await? == 0 {
            self.repo.insert_coaches(seeder::default_coaches()).await?;
            info!("inserted default coaches");
        }

        let coaches = self.repo.list_coaches(true).await?;
        Ok(self.seed_slots(&coaches, today).await)
    }

    async fn regenerate_slots(&self, today: NaiveDate) -> Result<SeedReport, ServiceError> {
        let coaches = self.repo.list_coaches(false).await?;

        let deleted = self.repo.delete_all_slots().await?;
        info!("deleted {deleted} time slots");

        Ok(self.seed_slots(&coaches, today).await)
    }

    async fn snapshot(&self) -> Result<SchedulingSnapshot, ServiceError> {
        Ok(SchedulingSnapshot {
            coaches: self.repo.list_coaches(false).await?,
            time_slots: self.repo.list_all_slots().await?,
            consultations: self.repo.list_consultations().await?,
        })
    }
}

#[injectable(NotificationService)]
pub struct MyNotificationService {
    mailer: Ref<dyn Mailer>,
    config: Ref<AppConfig>,
}

#[async_trait]
impl NotificationService for MyNotificationService {
    async fn send_consultation_confirmation(
        &self,
        notice: &ConsultationNotice,
    ) -> Result<(), ServiceError> {
        let confirmation = email::consultation_confirmation(notice)?;
        let admin_notice = email::consultation_admin_notice(notice, &self.config.admin_email)?;

        self.mailer.send(confirmation).await?;
        self.mailer.send(admin_notice).await?;
        Ok(())
    }

    async fn send_test_email(&self) -> Result<EmailReceipt, ServiceError> {
        let message = email::test_message(&self.config.admin_email)?;
        Ok(self.mailer.send(message).await?)
    }
}

#[injectable(LeadService)]
pub struct MyLeadService {
    store: Ref<dyn SubscriberStore>,
    mailer: Ref<dyn Mailer>,
    config: Ref<AppConfig>,
}

#[async_trait]
impl LeadService for MyLeadService {
    async fn send_cookbook(&self, request: CookbookRequest) -> Result<EmailReceipt, ServiceError> {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let (Some(email_address), Some(cookbook_id), Some(cookbook_title)) = (
            non_blank(request.email),
            non_blank(request.cookbook_id),
            non_blank(request.cookbook_title),
        ) else {
            return Err(ServiceError::validation("Missing required fields"));
        };

        if !email::is_valid_email(&email_address) {
            return Err(ServiceError::validation("Invalid email format"));
        }

        let cookbook = cookbooks::find(&cookbook_id)
            .ok_or_else(|| ServiceError::validation("Unknown cookbook"))?;

        if let Err(e) = self
            .store
            .save(NewSubscriber {
                email: email_address.clone(),
                cookbook_id: Some(cookbook.id.to_owned()),
                cookbook_title: Some(cookbook_title.clone()),
                source: Some(DEFAULT_SOURCE.to_owned()),
            })
            .await
        {
            error!("could not record subscriber {email_address}: {e}");
        }

        let download_url = format!(
            "{}/api/download-cookbook?id={}",
            self.config.public_base_url, cookbook.id
        );
        let message = email::cookbook_delivery(&email_address, &cookbook_title, &download_url)?;

        Ok(self.mailer.send(message).await?)
    }

    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, ServiceError> {
        Ok(self.store.list_active().await?)
    }

    async fn subscriber_stats(&self) -> Result<SubscriberStats, ServiceError> {
        Ok(self.store.stats().await?)
    }
}
