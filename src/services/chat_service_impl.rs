//! `SeaORM` implementation of the `ChatService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::types::{ChatMessageDto, ChatSummaryDto, HistoryDto, NewChatDto};
use crate::clients::openai::{ChatMessage, ChatRole, CompletionRequest, LlmClient};
use crate::config::LlmConfig;
use crate::db::Store;
use crate::services::chat_service::{ChatError, ChatService, IncomingMessage};
use crate::services::hashtag_service::Clock;

const MAX_HISTORY_PAGE: u64 = 200;

const GREETING: &str = "👋 Hi! Tell me what you'd like to share and I'll suggest some ideas.";

const CONSULTANT_PROMPT: &str = "You are a social media consultant. Give the user professional advice on \
content creation, posting times, growing engagement and hashtag use on platforms such as Instagram, \
X (Twitter) and LinkedIn.

- If the user names a platform, tailor the answer to that platform's dynamics.
- Use emoji and keep suggestions short, clear and actionable.
- Write an example post when it helps.
- Let the user know that answering a few questions will help you help them better.";

pub struct SeaOrmChatService {
    store: Store,
    llm: Arc<dyn LlmClient>,
    clock: Arc<dyn Clock>,
    model: String,
    temperature: f32,
}

impl SeaOrmChatService {
    #[must_use]
    pub fn new(
        store: Store,
        llm: Arc<dyn LlmClient>,
        clock: Arc<dyn Clock>,
        config: &LlmConfig,
    ) -> Self {
        Self {
            store,
            llm,
            clock,
            model: config.chat_model.clone(),
            temperature: config.chat_temperature,
        }
    }

    fn parse_messages(messages: Vec<IncomingMessage>) -> Result<Vec<ChatMessage>, ChatError> {
        messages
            .into_iter()
            .map(|m| {
                let role = ChatRole::parse(&m.role).ok_or_else(|| {
                    ChatError::Validation(format!("Unknown message role '{}'", m.role))
                })?;
                Ok(ChatMessage {
                    role,
                    content: m.content,
                })
            })
            .collect()
    }
}

fn validate_chat_id(chat_id: &str) -> Result<&str, ChatError> {
    let trimmed = chat_id.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(ChatError::Validation("chatId is required".to_string()));
    }
    Ok(trimmed)
}

#[async_trait]
impl ChatService for SeaOrmChatService {
    async fn reply(
        &self,
        chat_id: &str,
        messages: Vec<IncomingMessage>,
    ) -> Result<String, ChatError> {
        let chat_id = validate_chat_id(chat_id)?;
        let messages = Self::parse_messages(messages)?;
        if messages.is_empty() {
            return Err(ChatError::Validation("messages cannot be empty".to_string()));
        }

        for message in &messages {
            let role = message.role.as_str();
            if !self
                .store
                .message_exists(chat_id, role, &message.content)
                .await?
            {
                self.store
                    .add_message(chat_id, role, &message.content, self.clock.now())
                    .await?;
            }
        }

        let mut prompt = Vec::with_capacity(messages.len() + 1);
        prompt.push(ChatMessage::system(CONSULTANT_PROMPT));
        prompt.extend(messages);

        let request = CompletionRequest {
            model: Some(self.model.clone()),
            messages: prompt,
            temperature: self.temperature,
            max_tokens: None,
        };

        let reply = self.llm.complete(&request).await.map_err(|e| {
            warn!(chat_id = %chat_id, error = %e, "Chat completion failed");
            ChatError::Llm(e.to_string())
        })?;

        self.store
            .add_message(
                chat_id,
                ChatRole::Assistant.as_str(),
                &reply,
                self.clock.now(),
            )
            .await?;

        Ok(reply)
    }

    async fn start_chat(&self) -> Result<NewChatDto, ChatError> {
        let chat_id = uuid::Uuid::new_v4().to_string();
        let row = self
            .store
            .add_message(
                &chat_id,
                ChatRole::Assistant.as_str(),
                GREETING,
                self.clock.now(),
            )
            .await?;

        info!(chat_id = %chat_id, "Started new chat");

        Ok(NewChatDto {
            chat_id,
            message: ChatMessageDto::from(row),
        })
    }

    async fn history(
        &self,
        chat_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<HistoryDto, ChatError> {
        let Some(chat_id) = chat_id.and_then(|id| validate_chat_id(id).ok()) else {
            return Ok(HistoryDto {
                messages: Vec::new(),
                total: 0,
            });
        };

        let limit = limit.min(MAX_HISTORY_PAGE);
        let total = self.store.count_messages(chat_id).await?;
        let end = total.saturating_sub(offset);
        let skip = end.saturating_sub(limit);

        let messages = self
            .store
            .get_messages(chat_id, skip, end - skip)
            .await?
            .into_iter()
            .map(ChatMessageDto::from)
            .collect();

        Ok(HistoryDto { messages, total })
    }

    async fn list_chats(&self) -> Result<Vec<ChatSummaryDto>, ChatError> {
        Ok(self
            .store
            .list_chats()
            .await?
            .into_iter()
            .map(ChatSummaryDto::from)
            .collect())
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<u64, ChatError> {
        let chat_id = validate_chat_id(chat_id)?;
        let removed = self.store.delete_chat(chat_id).await?;
        info!(chat_id = %chat_id, removed, "Deleted chat");
        Ok(removed)
    }
}
