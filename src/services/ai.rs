//! LLM-assisted drafting and conversation summaries.

use serde::Serialize;
use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::conversation_summary::{ConversationSummary, NewConversationSummary};
use crate::domain::sms_log::SmsLog;
use crate::domain::types::{CustomerId, SummaryText};
use crate::forms::ai::{DraftForm, SummarizeForm};
use crate::llm::{ChatCompletion, ChatMessage};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::LlmConfig;
use crate::repository::{
    ConversationSummaryReader, ConversationSummaryWriter, CustomerReader, SmsLogReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Number of most recent messages fed into a summary.
pub const SUMMARY_WINDOW: usize = 30;

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft: String,
}

fn context_message(customer_name: &str, summary: Option<&str>) -> ChatMessage {
    let summary = summary.unwrap_or("(이전 대화 없음)");
    ChatMessage::system(format!(
        "고객 이름: {customer_name}\n이전 대화 요약: {summary}"
    ))
}

/// Renders logs oldest first, one message per line.
fn transcript(logs: &[SmsLog]) -> String {
    logs.iter()
        .rev()
        .map(|log| {
            let outcome = if log.success { "sent" } else { "failed" };
            format!(
                "[{}] ({outcome}) {}",
                log.created_at.format("%Y-%m-%d %H:%M"),
                log.body.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Asks the LLM for a message draft addressed to one customer.
pub async fn draft_message<R>(
    repo: &R,
    llm: &dyn ChatCompletion,
    config: &LlmConfig,
    user: &AuthenticatedUser,
    form: DraftForm,
) -> ServiceResult<DraftResponse>
where
    R: CustomerReader + ConversationSummaryReader + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let customer_id = CustomerId::new(form.customer_id).map_err(|_| ServiceError::NotFound)?;
    if let Err(err) = form.validate() {
        log::warn!("Rejected draft request: {err}");
        return Err(ServiceError::Form("요청 내용을 입력해 주세요.".to_string()));
    }

    let customer = repo
        .get_customer(customer_id, user_id)?
        .ok_or(ServiceError::NotFound)?;
    let summary = repo.get_summary(customer_id, user_id)?;

    let messages = [
        ChatMessage::system(config.system_prompt.as_str()),
        context_message(
            customer.name.as_str(),
            summary.as_ref().map(|s| s.summary.as_str()),
        ),
        ChatMessage::user(form.instruction.trim()),
    ];

    let draft = llm.complete(&messages).await.map_err(|err| {
        log::error!("Failed to draft message for customer {customer_id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(DraftResponse { draft })
}

/// Condenses the latest messages with a customer and stores the summary.
pub async fn summarize_conversation<R>(
    repo: &R,
    llm: &dyn ChatCompletion,
    config: &LlmConfig,
    user: &AuthenticatedUser,
    form: SummarizeForm,
) -> ServiceResult<ConversationSummary>
where
    R: CustomerReader + SmsLogReader + ConversationSummaryWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let customer_id = CustomerId::new(form.customer_id).map_err(|_| ServiceError::NotFound)?;

    repo.get_customer(customer_id, user_id)?
        .ok_or(ServiceError::NotFound)?;

    let logs = repo.list_customer_sms_logs(customer_id, user_id, SUMMARY_WINDOW)?;
    if logs.is_empty() {
        return Err(ServiceError::Form("요약할 메시지가 없습니다.".to_string()));
    }

    let messages = [
        ChatMessage::system(config.summary_prompt.as_str()),
        ChatMessage::user(transcript(&logs)),
    ];
    let text = llm.complete(&messages).await.map_err(|err| {
        log::error!("Failed to summarize conversation with {customer_id}: {err}");
        ServiceError::from(err)
    })?;

    let summary = NewConversationSummary {
        customer_id,
        user_id,
        summary: SummaryText::new(text)?,
    };
    repo.upsert_summary(&summary).map_err(|err| {
        log::error!("Failed to store summary for {customer_id}: {err}");
        ServiceError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::customer::Customer;
    use crate::llm::{LlmError, MockLlm, Role};
    use crate::models::config::tests::config;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{USER_ID, sales_user};

    fn customer() -> Customer {
        let now = Utc::now().naive_utc();
        Customer::try_new(
            7,
            USER_ID,
            "김철수".to_string(),
            "+821012345678".to_string(),
            None,
            None,
            now,
            now,
        )
        .unwrap()
    }

    fn log(id: i32, minutes_ago: i64, body: &str) -> SmsLog {
        SmsLog::try_new(
            id,
            USER_ID,
            id,
            Some(7),
            "+821012345678".to_string(),
            body.to_string(),
            true,
            None,
            Utc::now().naive_utc() - Duration::minutes(minutes_ago),
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn draft_sends_system_context_and_instruction() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer()
            .returning(|_, _| Ok(Some(customer())));
        repo.expect_get_summary().returning(|_, _| Ok(None));

        let mut llm = MockLlm::new();
        llm.expect_complete()
            .withf(|messages| {
                messages.len() == 3
                    && messages[0].role == Role::System
                    && messages[1].content.contains("김철수")
                    && messages[2].role == Role::User
                    && messages[2].content == "신상품 안내"
            })
            .times(1)
            .returning(|_| Ok("김철수님, 신상품이 입고되었습니다.".to_string()));

        let cfg = config("./storage");
        let form = DraftForm {
            customer_id: 7,
            instruction: " 신상품 안내 ".to_string(),
        };
        let response = draft_message(&repo, &llm, &cfg.deepseek, &sales_user(), form)
            .await
            .unwrap();
        assert!(response.draft.starts_with("김철수님"));
    }

    #[actix_web::test]
    async fn invalid_customer_id_is_not_found_for_both_operations() {
        let repo = MockRepository::new();
        let mut llm = MockLlm::new();
        llm.expect_complete().times(0);
        let cfg = config("./storage");

        let form = DraftForm {
            customer_id: 0,
            instruction: "안부 인사".to_string(),
        };
        let result = draft_message(&repo, &llm, &cfg.deepseek, &sales_user(), form).await;
        assert!(matches!(result, Err(ServiceError::NotFound)));

        let result = summarize_conversation(
            &repo,
            &llm,
            &cfg.deepseek,
            &sales_user(),
            SummarizeForm { customer_id: -3 },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[actix_web::test]
    async fn disabled_llm_is_an_external_error() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer()
            .returning(|_, _| Ok(Some(customer())));
        repo.expect_get_summary().returning(|_, _| Ok(None));

        let mut llm = MockLlm::new();
        llm.expect_complete().returning(|_| Err(LlmError::Disabled));

        let cfg = config("./storage");
        let form = DraftForm {
            customer_id: 7,
            instruction: "안부 인사".to_string(),
        };
        let result = draft_message(&repo, &llm, &cfg.deepseek, &sales_user(), form).await;
        assert!(matches!(result, Err(ServiceError::External(_))));
    }

    #[actix_web::test]
    async fn summary_uses_chronological_transcript_and_upserts() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer()
            .returning(|_, _| Ok(Some(customer())));
        repo.expect_list_customer_sms_logs()
            .withf(|_, _, limit| *limit == SUMMARY_WINDOW)
            .returning(|_, _, _| Ok(vec![log(2, 1, "두 번째"), log(1, 10, "첫 번째")]));
        repo.expect_upsert_summary()
            .withf(|s| s.customer_id.get() == 7 && s.summary.as_str() == "요약")
            .times(1)
            .returning(|s| {
                Ok(ConversationSummary {
                    customer_id: s.customer_id,
                    user_id: s.user_id,
                    summary: s.summary.clone(),
                    updated_at: Utc::now().naive_utc(),
                })
            });

        let mut llm = MockLlm::new();
        llm.expect_complete()
            .withf(|messages| {
                let text = &messages[1].content;
                matches!((text.find("첫 번째"), text.find("두 번째")), (Some(a), Some(b)) if a < b)
            })
            .times(1)
            .returning(|_| Ok(" 요약 ".to_string()));

        let cfg = config("./storage");
        let summary = summarize_conversation(
            &repo,
            &llm,
            &cfg.deepseek,
            &sales_user(),
            SummarizeForm { customer_id: 7 },
        )
        .await
        .unwrap();
        assert_eq!(summary.summary.as_str(), "요약");
    }

    #[actix_web::test]
    async fn summary_without_messages_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer()
            .returning(|_, _| Ok(Some(customer())));
        repo.expect_list_customer_sms_logs()
            .returning(|_, _, _| Ok(Vec::new()));

        let llm = MockLlm::new();
        let cfg = config("./storage");
        let result = summarize_conversation(
            &repo,
            &llm,
            &cfg.deepseek,
            &sales_user(),
            SummarizeForm { customer_id: 7 },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
