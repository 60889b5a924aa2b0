use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, render_template};
use tera::Tera;

use crate::repository::DieselRepository;
use crate::routes::{action_error, filter_query, page_error};
use crate::services::reports::{ReportQuery, export_report_csv, load_report};

#[get("/reports")]
pub async fn show_reports(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: ReportQuery = filter_query(&req);

    match load_report(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "reports",
                &server_config.auth_service_url,
            );
            context.insert("report", &data.report);
            context.insert("branches", &data.branches);
            context.insert("from", &data.from);
            context.insert("to", &data.to);
            context.insert("branch_id", &data.branch_id);
            context.insert("export_query", req.query_string());
            render_template(&tera, "reports/index.html", &context)
        }
        Err(err) => page_error(err, "reports"),
    }
}

/// Same filters as the report page, returned as a CSV attachment.
#[get("/reports/export")]
pub async fn export_report(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query: ReportQuery = filter_query(&req);

    let csv = load_report(repo.get_ref(), &user, query)
        .and_then(|data| export_report_csv(&data.report));

    match csv {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename("report.csv".to_string())],
            })
            .body(body),
        Err(err) => action_error(err, "export the report", "/reports"),
    }
}
