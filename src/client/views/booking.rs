use time::Date;
use tracing::debug;

use crate::{
    bookings::dto::BookingRequest,
    client::{
        api::{ApiClient, Operation},
        cancel::{Canceller, RequestScope},
        error::{ClientError, ValidationError},
        notify::ViewOutcome,
    },
    schedule::{format_date, is_date_disabled, TIME_SLOTS},
};

use super::{optional, require, require_email};

const BOOKED: &str = "Booking request submitted successfully! We'll be in touch soon.";

/// Fit-call booking: contact fields plus a date then a time slot.
#[derive(Default)]
pub struct BookingView {
    pub name: String,
    pub email: String,
    pub message: String,
    date: Option<Date>,
    time: Option<&'static str>,
    submitting: bool,
    scope: RequestScope,
}

impl BookingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn canceller(&self) -> Canceller {
        self.scope.canceller()
    }

    pub fn selected_date(&self) -> Option<Date> {
        self.date
    }

    pub fn selected_time(&self) -> Option<&'static str> {
        self.time
    }

    /// Calendar cells before `today` are greyed out.
    pub fn is_date_disabled(&self, date: Date, today: Date) -> bool {
        is_date_disabled(date, today)
    }

    pub fn select_date(&mut self, date: Date, today: Date) -> Result<(), ValidationError> {
        if is_date_disabled(date, today) {
            return Err(ValidationError::PastDate);
        }
        self.date = Some(date);
        Ok(())
    }

    /// Slots are offered once a date is picked.
    pub fn available_slots(&self) -> &'static [&'static str] {
        match self.date {
            Some(_) => &TIME_SLOTS,
            None => &[],
        }
    }

    pub fn select_time(&mut self, slot: &str) -> Result<(), ValidationError> {
        let slot = TIME_SLOTS
            .iter()
            .copied()
            .find(|s| *s == slot)
            .ok_or(ValidationError::UnknownTimeSlot)?;
        self.time = Some(slot);
        Ok(())
    }

    fn validate(&self, today: Date) -> Result<BookingRequest, ValidationError> {
        let (Some(date), Some(time)) = (self.date, self.time) else {
            return Err(ValidationError::MissingDateOrTime);
        };
        require(&self.name, "name")?;
        require_email(&self.email)?;
        if is_date_disabled(date, today) {
            return Err(ValidationError::PastDate);
        }
        Ok(BookingRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            date: format_date(date),
            time: time.to_string(),
            message: optional(&self.message),
        })
    }

    pub async fn submit(&mut self, api: &ApiClient, today: Date) -> ViewOutcome {
        let req = match self.validate(today) {
            Ok(req) => req,
            Err(e) => return ViewOutcome::error(e.to_string()),
        };

        self.submitting = true;
        let res = api.create_booking(&self.scope, &req).await;
        self.submitting = false;

        match res {
            Ok(booking) => {
                debug!(booking_id = %booking.id, "booking accepted");
                self.reset();
                ViewOutcome::success(BOOKED)
            }
            Err(ClientError::Cancelled) => ViewOutcome::none(),
            Err(e) => {
                debug!(error = %e, "booking failed");
                ViewOutcome::error(Operation::CreateBooking.default_message())
            }
        }
    }

    fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.date = None;
        self.time = None;
    }
}
