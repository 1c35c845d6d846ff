//! Message-passing front for a chat session
//!
//! The session runs on its own task. Commands arrive over an mpsc channel,
//! client completions come back over a second channel, and every state change
//! is published as a [`ChatSnapshot`] on a watch channel.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use super::controller::{ChatSession, Submission};
use super::state::{ChatSnapshot, SubmitOutcome};
use crate::domain::chat::ChatResponse;
use crate::domain::DomainError;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug)]
enum SessionCommand {
    SetInput(String),
    Submit {
        reply: oneshot::Sender<SubmitOutcome>,
    },
    QuickSubmit {
        question: String,
        reply: oneshot::Sender<SubmitOutcome>,
    },
}

#[derive(Debug)]
struct Completion {
    question: String,
    result: Result<ChatResponse, DomainError>,
}

/// Cloneable handle to a running chat session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshot: watch::Receiver<ChatSnapshot>,
}

impl ChatSession {
    /// Moves the session onto a tokio task and returns a handle to it
    ///
    /// The task stops once every handle has been dropped.
    pub fn spawn(self) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(self.snapshot());

        tokio::spawn(run_session(self, command_rx, snapshot_tx));

        SessionHandle {
            commands: command_tx,
            snapshot: snapshot_rx,
        }
    }
}

impl SessionHandle {
    pub async fn set_input(&self, text: impl Into<String>) -> Result<(), DomainError> {
        self.send(SessionCommand::SetInput(text.into())).await
    }

    /// Submits the current input
    ///
    /// Returns once the session has accepted or refused the question; a
    /// `Pending` outcome resolves in a later snapshot.
    pub async fn submit(&self) -> Result<SubmitOutcome, DomainError> {
        let (reply, outcome) = oneshot::channel();
        self.send(SessionCommand::Submit { reply }).await?;
        outcome.await.map_err(|_| stopped())
    }

    pub async fn quick_submit(
        &self,
        question: impl Into<String>,
    ) -> Result<SubmitOutcome, DomainError> {
        let (reply, outcome) = oneshot::channel();
        self.send(SessionCommand::QuickSubmit {
            question: question.into(),
            reply,
        })
        .await?;
        outcome.await.map_err(|_| stopped())
    }

    /// Latest published state
    pub fn snapshot(&self) -> ChatSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.snapshot.clone()
    }

    /// Waits until no request is in flight and returns that state
    pub async fn settled(&self) -> Result<ChatSnapshot, DomainError> {
        let mut receiver = self.snapshot.clone();
        let snapshot = receiver
            .wait_for(|snapshot| !snapshot.is_loading())
            .await
            .map_err(|_| stopped())?;

        Ok(snapshot.clone())
    }

    async fn send(&self, command: SessionCommand) -> Result<(), DomainError> {
        self.commands.send(command).await.map_err(|_| stopped())
    }
}

fn stopped() -> DomainError {
    DomainError::internal("Chat session has stopped")
}

async fn run_session(
    mut session: ChatSession,
    mut commands: mpsc::Receiver<SessionCommand>,
    snapshot: watch::Sender<ChatSnapshot>,
) {
    let (completion_tx, mut completions) = mpsc::channel::<Completion>(1);

    loop {
        tokio::select! {
            Some(completion) = completions.recv() => {
                // The outcome already lives in the snapshot
                let _ = session.complete(&completion.question, completion.result);
                snapshot.send_replace(session.snapshot());
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };

                let reply = handle_command(&mut session, command, &completion_tx);
                snapshot.send_replace(session.snapshot());

                // Reply only once the snapshot reflects the command
                if let Some((reply, outcome)) = reply {
                    let _ = reply.send(outcome);
                }
            }
        }
    }

    debug!("Chat session stopped");
}

fn handle_command(
    session: &mut ChatSession,
    command: SessionCommand,
    completion_tx: &mpsc::Sender<Completion>,
) -> Option<(oneshot::Sender<SubmitOutcome>, SubmitOutcome)> {
    match command {
        SessionCommand::SetInput(text) => {
            session.set_input(text);
            None
        }
        SessionCommand::Submit { reply } => {
            let submission = session.begin_submit();
            Some((reply, dispatch(session, submission, completion_tx)))
        }
        SessionCommand::QuickSubmit { question, reply } => {
            let submission = session.begin_quick_submit(&question);
            Some((reply, dispatch(session, submission, completion_tx)))
        }
    }
}

fn dispatch(
    session: &ChatSession,
    submission: Submission,
    completion_tx: &mpsc::Sender<Completion>,
) -> SubmitOutcome {
    match submission {
        Submission::Rejected(reason) => SubmitOutcome::Rejected(reason),
        Submission::Answered(message) => SubmitOutcome::Answered(message),
        Submission::Dispatch(question) => {
            let client = session.client();
            let completion_tx = completion_tx.clone();

            tokio::spawn(async move {
                let result = client.ask_question(&question).await;
                let _ = completion_tx.send(Completion { question, result }).await;
            });

            SubmitOutcome::Pending
        }
    }
}
