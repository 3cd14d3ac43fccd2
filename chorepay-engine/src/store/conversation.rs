use chorepay_shared::domain::{MessageId, Sender, TaskId, TaskMessage};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::{Store, StoreError};

impl Store {
    /// Parent asks for more detail on a submitted task. The task stays
    /// in its current status; pending clarification is the
    /// `needs_response` flag, not a separate status.
    pub fn request_clarification(
        &mut self,
        id: &TaskId,
        text: &str,
    ) -> Result<MessageId, StoreError> {
        self.post_message(id, Sender::Parent, text)
    }

    /// Append a message from either party. The `needs_response` flag is
    /// recomputed in the same mutation as the append: a parent message
    /// raises it, a child reply clears it.
    pub fn post_message(
        &mut self,
        id: &TaskId,
        from: Sender,
        text: &str,
    ) -> Result<MessageId, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "message must not be empty".to_string(),
            ));
        }
        let idx = self.task_index(id)?;
        let message = TaskMessage {
            id: MessageId(Uuid::new_v4().to_string()),
            from,
            message: text.to_string(),
            timestamp: Utc::now(),
        };
        let message_id = message.id.clone();
        let task = &mut self.state.tasks[idx];
        task.conversation.push(message);
        task.needs_response = from == Sender::Parent;
        debug!(task_id = %id, from = ?from, needs_response = task.needs_response, "task message appended");
        Ok(message_id)
    }
}
