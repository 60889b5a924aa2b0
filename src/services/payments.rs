use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingStatus;
use crate::domain::payment::{NewPayment, Payment, PaymentListQuery, PaymentStatus};
use crate::forms::DEFAULT_CURRENCY;
use crate::forms::payments::{ManualPaymentForm, RefundForm};
use crate::gateway::{GatewayError, PaymentGateway, PaymentIntent, PaymentIntentPage, Refund};
use crate::repository::{AdminReader, BookingReader, BranchReader, PaymentReader, PaymentWriter};
use crate::services::access::{ensure_branch_access, require_platform, resolve_scope};
use crate::services::{ServiceError, ServiceResult};

/// Payment intents fetched per gateway page.
pub const INTENTS_PER_PAGE: u32 = 25;

#[derive(Debug, Default, Deserialize)]
pub struct PaymentsQuery {
    pub page: Option<usize>,
    pub status: Option<String>,
}

pub struct PaymentsPageData {
    pub payments: Paginated<Payment>,
    pub status: Option<PaymentStatus>,
    /// Whether the online payments section can be shown.
    pub gateway_enabled: bool,
}

/// Result of a refund issued through the gateway.
#[derive(Debug, Serialize)]
pub struct RefundOutcome {
    pub refund: Refund,
    /// Local payment row updated with the refund, when one references the intent.
    pub payment: Option<Payment>,
}

pub fn load_payments_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PaymentsQuery,
    gateway_enabled: bool,
) -> ServiceResult<PaymentsPageData>
where
    R: AdminReader + BranchReader + PaymentReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let page = query.page.unwrap_or(1).max(1);

    let mut list_query = PaymentListQuery::new(user.hub_id)
        .restrict_to(scope.branch_filter())
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    let status = query
        .status
        .as_deref()
        .and_then(|value| value.parse::<PaymentStatus>().ok());
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let (total, payments) = repo.list_payments(list_query).map_err(ServiceError::from)?;

    Ok(PaymentsPageData {
        payments: Paginated::new(payments, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        status,
        gateway_enabled: gateway_enabled && scope.is_platform(),
    })
}

/// Records a cash or card payment taken at the branch.
///
/// A blank amount charges the booking price; cancelled bookings cannot be paid.
pub fn record_manual_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ManualPaymentForm,
) -> ServiceResult<Payment>
where
    R: AdminReader + BranchReader + BookingReader + PaymentWriter + ?Sized,
{
    let scope = resolve_scope(repo, user)?;

    let manual = form
        .into_manual_payment()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let booking = repo
        .get_booking_by_id(manual.booking_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    ensure_branch_access(&scope, booking.branch_id)?;

    if booking.status == BookingStatus::Cancelled {
        return Err(ServiceError::Conflict(
            "cancelled bookings cannot be paid".to_string(),
        ));
    }

    let amount_cents = manual.amount_cents.unwrap_or(booking.price_cents);
    if amount_cents <= 0 {
        return Err(ServiceError::Form("amount must be greater than zero".to_string()));
    }
    let currency = manual
        .currency
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let new_payment = NewPayment::new(user.hub_id, amount_cents, currency, manual.method)
        .for_booking(booking.id)
        .with_status(PaymentStatus::Succeeded);

    let payment = repo.create_payment(&new_payment).map_err(ServiceError::from)?;
    log::info!(
        "Recorded {} payment {} for booking {}",
        payment.method.as_str(),
        payment.id,
        booking.id
    );
    Ok(payment)
}

fn configured<G>(gateway: Option<&G>) -> ServiceResult<&G>
where
    G: PaymentGateway + ?Sized,
{
    gateway.ok_or(ServiceError::Gateway(GatewayError::NotConfigured))
}

/// Lists payment intents at the gateway, starting after `cursor`.
pub async fn list_payment_intents<G>(
    gateway: Option<&G>,
    user: &AuthenticatedUser,
    cursor: Option<String>,
) -> ServiceResult<PaymentIntentPage>
where
    G: PaymentGateway + ?Sized,
{
    require_platform(user)?;
    let gateway = configured(gateway)?;

    let cursor = cursor.filter(|value| !value.trim().is_empty());
    Ok(gateway.list_payment_intents(INTENTS_PER_PAGE, cursor).await?)
}

pub async fn retrieve_payment_intent<G>(
    gateway: Option<&G>,
    user: &AuthenticatedUser,
    payment_intent_id: &str,
) -> ServiceResult<PaymentIntent>
where
    G: PaymentGateway + ?Sized,
{
    require_platform(user)?;
    let gateway = configured(gateway)?;

    match gateway.retrieve_payment_intent(payment_intent_id).await {
        Ok(intent) => Ok(intent),
        Err(err) if err.is_not_found() => Err(ServiceError::NotFound),
        Err(err) => Err(err.into()),
    }
}

/// Refunds a payment intent in full or in part and mirrors the refund locally.
///
/// The refundable amount is taken from the local payment row when one
/// references the intent, otherwise from what the gateway received minus the
/// refunds already made on its charge.
pub async fn refund_payment<R, G>(
    repo: &R,
    gateway: Option<&G>,
    user: &AuthenticatedUser,
    form: RefundForm,
) -> ServiceResult<RefundOutcome>
where
    R: PaymentReader + PaymentWriter + ?Sized,
    G: PaymentGateway + ?Sized,
{
    require_platform(user)?;
    let gateway = configured(gateway)?;

    let (intent_id, requested) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let intent = match gateway.retrieve_payment_intent(&intent_id).await {
        Ok(intent) => intent,
        Err(err) if err.is_not_found() => return Err(ServiceError::NotFound),
        Err(err) => return Err(err.into()),
    };

    let local = repo
        .get_payment_by_gateway_reference(&intent.id, user.hub_id)
        .map_err(ServiceError::from)?;

    let remaining = match &local {
        Some(payment) => i64::from(payment.remaining_cents()),
        None => intent.refundable_amount(),
    };
    let amount = requested.map(i64::from).unwrap_or(remaining);

    if remaining <= 0 {
        return Err(ServiceError::Conflict(format!(
            "payment {} has nothing left to refund",
            intent.id
        )));
    }
    if amount <= 0 || amount > remaining {
        return Err(ServiceError::Form(format!(
            "refund amount must be between 0.01 and {}",
            crate::forms::format_money(remaining)
        )));
    }

    let refund = gateway.create_refund(&intent.id, Some(amount)).await?;
    log::info!("Refunded {amount} of payment intent {}", intent.id);

    let payment = match local {
        Some(payment) => {
            let refund_cents = i32::try_from(amount)
                .map_err(|_| ServiceError::Form("refund amount is too large".to_string()))?;
            Some(
                repo.record_refund(payment.id, user.hub_id, refund_cents)
                    .map_err(ServiceError::from)?,
            )
        }
        None => {
            log::warn!("No local payment references intent {}", intent.id);
            None
        }
    };

    Ok(RefundOutcome { refund, payment })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::payment::PaymentMethod;
    use crate::gateway::{Charge, LatestCharge, MockPaymentGateway};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        HUB_ID, platform_user, sample_booking, sample_payment, user_with_roles,
    };
    use crate::{BRANCH_ADMIN_ROLE, FRANCHISE_ADMIN_ROLE};

    fn intent(id: &str, amount: i64) -> PaymentIntent {
        PaymentIntent {
            id: id.to_string(),
            amount,
            amount_received: amount,
            currency: "usd".to_string(),
            status: "succeeded".to_string(),
            created: 1_714_557_600,
            description: None,
            metadata: HashMap::new(),
            latest_charge: None,
        }
    }

    fn refund(amount: i64) -> Refund {
        Refund {
            id: "re_1".to_string(),
            amount,
            currency: "usd".to_string(),
            status: "succeeded".to_string(),
            payment_intent: Some("pi_1".to_string()),
        }
    }

    fn online_payment(amount_cents: i32, refunded_cents: i32) -> Payment {
        let mut payment = sample_payment(3, Some(1), amount_cents);
        payment.method = PaymentMethod::Online;
        payment.refunded_cents = refunded_cents;
        payment.gateway_reference = Some("pi_1".to_string());
        payment
    }

    fn refund_form(amount: Option<&str>) -> RefundForm {
        RefundForm {
            payment_intent_id: "pi_1".to_string(),
            amount: amount.map(str::to_string),
        }
    }

    #[test]
    fn manual_payment_defaults_to_booking_price() {
        let mut repo = MockRepository::new();
        repo.expect_get_booking_by_id()
            .returning(|id, _| Ok(Some(sample_booking(id, 1, BookingStatus::Completed))));
        repo.expect_create_payment()
            .times(1)
            .withf(|new| {
                new.amount_cents == 2000
                    && new.currency == "USD"
                    && new.method == PaymentMethod::Cash
                    && new.status == PaymentStatus::Succeeded
                    && new.booking_id == Some(4)
            })
            .returning(|new| Ok(sample_payment(1, new.booking_id, new.amount_cents)));

        let form = ManualPaymentForm {
            booking_id: 4,
            amount: None,
            currency: None,
            method: "cash".to_string(),
        };
        let payment = record_manual_payment(&repo, &platform_user(), form).expect("recorded");

        assert_eq!(payment.amount_cents, 2000);
    }

    #[test]
    fn cancelled_booking_cannot_be_paid() {
        let mut repo = MockRepository::new();
        repo.expect_get_booking_by_id()
            .returning(|id, _| Ok(Some(sample_booking(id, 1, BookingStatus::Cancelled))));
        repo.expect_create_payment().never();

        let form = ManualPaymentForm {
            booking_id: 4,
            amount: Some("5".to_string()),
            currency: None,
            method: "card".to_string(),
        };
        let result = record_manual_payment(&repo, &platform_user(), form);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[actix_web::test]
    async fn gateway_calls_require_configuration() {
        let result =
            list_payment_intents::<MockPaymentGateway>(None, &platform_user(), None).await;

        assert!(matches!(
            result,
            Err(ServiceError::Gateway(GatewayError::NotConfigured))
        ));
    }

    #[actix_web::test]
    async fn gateway_calls_are_platform_only() {
        let gateway = MockPaymentGateway::new();
        let user = user_with_roles(&[FRANCHISE_ADMIN_ROLE, BRANCH_ADMIN_ROLE]);

        let result = retrieve_payment_intent(Some(&gateway), &user, "pi_1").await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn list_forwards_cursor() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_list_payment_intents()
            .withf(|limit, cursor| *limit == INTENTS_PER_PAGE && cursor.as_deref() == Some("pi_9"))
            .returning(|_, _| {
                Ok(PaymentIntentPage {
                    data: vec![intent("pi_10", 500)],
                    has_more: false,
                })
            });

        let page = list_payment_intents(Some(&gateway), &platform_user(), Some("pi_9".to_string()))
            .await
            .expect("page");

        assert_eq!(page.data.len(), 1);
    }

    #[actix_web::test]
    async fn partial_refund_updates_local_payment() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_retrieve_payment_intent()
            .returning(|id| Ok(intent(id, 5000)));
        gateway
            .expect_create_refund()
            .times(1)
            .withf(|id, amount| id == "pi_1" && *amount == Some(1500))
            .returning(|_, amount| Ok(refund(amount.unwrap_or_default())));

        let mut repo = MockRepository::new();
        repo.expect_get_payment_by_gateway_reference()
            .withf(|reference, hub_id| reference == "pi_1" && *hub_id == HUB_ID)
            .returning(|_, _| Ok(Some(online_payment(5000, 1000))));
        repo.expect_record_refund()
            .times(1)
            .withf(|payment_id, _, cents| *payment_id == 3 && *cents == 1500)
            .returning(|_, _, _| {
                let mut payment = online_payment(5000, 2500);
                payment.status = PaymentStatus::PartiallyRefunded;
                Ok(payment)
            });

        let outcome = refund_payment(&repo, Some(&gateway), &platform_user(), refund_form(Some("15.00")))
            .await
            .expect("refunded");

        assert_eq!(outcome.refund.amount, 1500);
        assert_eq!(
            outcome.payment.map(|payment| payment.status),
            Some(PaymentStatus::PartiallyRefunded)
        );
    }

    #[actix_web::test]
    async fn refund_cannot_exceed_remaining_amount() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_retrieve_payment_intent()
            .returning(|id| Ok(intent(id, 5000)));
        gateway.expect_create_refund().never();

        let mut repo = MockRepository::new();
        repo.expect_get_payment_by_gateway_reference()
            .returning(|_, _| Ok(Some(online_payment(5000, 4000))));
        repo.expect_record_refund().never();

        let result =
            refund_payment(&repo, Some(&gateway), &platform_user(), refund_form(Some("10.01"))).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn blank_amount_refunds_the_rest_without_local_row() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_retrieve_payment_intent()
            .returning(|id| Ok(intent(id, 1200)));
        gateway
            .expect_create_refund()
            .withf(|_, amount| *amount == Some(1200))
            .returning(|_, amount| Ok(refund(amount.unwrap_or_default())));

        let mut repo = MockRepository::new();
        repo.expect_get_payment_by_gateway_reference()
            .returning(|_, _| Ok(None));

        let outcome = refund_payment(&repo, Some(&gateway), &platform_user(), refund_form(None))
            .await
            .expect("refunded");

        assert!(outcome.payment.is_none());
    }

    #[actix_web::test]
    async fn earlier_gateway_refunds_limit_the_amount_without_local_row() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_retrieve_payment_intent().returning(|id| {
            let mut partially_refunded = intent(id, 2000);
            partially_refunded.latest_charge = Some(LatestCharge::Expanded(Charge {
                id: "ch_1".to_string(),
                amount_refunded: 1500,
            }));
            Ok(partially_refunded)
        });
        gateway.expect_create_refund().never();

        let mut repo = MockRepository::new();
        repo.expect_get_payment_by_gateway_reference()
            .returning(|_, _| Ok(None));

        let result =
            refund_payment(&repo, Some(&gateway), &platform_user(), refund_form(Some("10.00"))).await;

        match result {
            Err(ServiceError::Form(message)) => assert!(message.ends_with("5.00")),
            other => panic!("expected a form error, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn unknown_intent_is_not_found() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_retrieve_payment_intent().returning(|_| {
            Err(GatewayError::Http {
                status: 404,
                message: "No such payment_intent".to_string(),
            })
        });

        let result = retrieve_payment_intent(Some(&gateway), &platform_user(), "pi_x").await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
