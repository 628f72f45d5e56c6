use std::collections::HashMap;

use uuid::Uuid;

use crate::core::metrics::{record_attempt_event, AttemptEvent};
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::{AnswerChoice, ExamAttempt};
use crate::repositories::attempt_answers::UpsertAnswer;
use crate::repositories::attempts::CreateAttempt;
use crate::schemas::attempt::{
    AttemptResultResponse, AttemptTakeResponse, ChoiceOption, ResultQuestion, TakeQuestion,
};
use crate::services::scoring::{self, ScoringError};

#[derive(Debug, thiserror::Error)]
pub(crate) enum AttemptError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Validation(#[from] ScoringError),
    #[error("{0}")]
    Conflict(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug)]
pub(crate) enum StartOutcome {
    Created(ExamAttempt),
    Resumed(ExamAttempt),
    /// Re-attempts are disabled and the user already finished this exam.
    AlreadySubmitted(ExamAttempt),
}

#[derive(Debug)]
pub(crate) enum SaveOutcome {
    Saved(ExamAttempt),
    AlreadySubmitted,
}

#[derive(Debug)]
pub(crate) enum SubmitOutcome {
    Submitted(ExamAttempt),
    AlreadySubmitted,
}

#[derive(Debug)]
pub(crate) enum TakeOutcome {
    Take(AttemptTakeResponse),
    Submitted,
}

#[derive(Debug)]
pub(crate) enum ResultOutcome {
    Result(AttemptResultResponse),
    InProgress,
}

/// Returns the caller's in-progress attempt for the exam, creating it on first access.
pub(crate) async fn start_or_resume(
    state: &AppState,
    exam_id: &str,
    user_id: &str,
) -> Result<StartOutcome, AttemptError> {
    let mut tx = state.db().begin().await?;

    if crate::repositories::exams::find_by_id(&mut *tx, exam_id).await?.is_none() {
        return Err(AttemptError::NotFound("Exam not found"));
    }

    crate::repositories::attempts::acquire_start_lock(&mut *tx, exam_id, user_id).await?;

    if let Some(existing) =
        crate::repositories::attempts::find_in_progress(&mut *tx, exam_id, user_id).await?
    {
        tx.commit().await?;
        record_attempt_event(AttemptEvent::Resumed);
        tracing::info!(attempt_id = %existing.id, exam_id, user_id, "Exam attempt resumed");
        return Ok(StartOutcome::Resumed(existing));
    }

    if !state.settings().exam().allow_reattempt {
        if let Some(finished) =
            crate::repositories::attempts::find_latest_submitted(&mut *tx, exam_id, user_id)
                .await?
        {
            tx.commit().await?;
            tracing::info!(
                attempt_id = %finished.id,
                exam_id,
                user_id,
                "Exam already submitted and re-attempts are disabled"
            );
            return Ok(StartOutcome::AlreadySubmitted(finished));
        }
    }

    let totals = crate::repositories::exams::totals(&mut *tx, exam_id).await?;
    let attempt_id = Uuid::new_v4().to_string();
    let created = crate::repositories::attempts::create_in_progress(
        &mut *tx,
        CreateAttempt {
            id: &attempt_id,
            user_id,
            exam_id,
            full_mark: totals.question_marks_total,
            now: primitive_now_utc(),
        },
    )
    .await?;

    let attempt = crate::repositories::attempts::find_in_progress(&mut *tx, exam_id, user_id)
        .await?
        .ok_or(AttemptError::Conflict("Could not start exam attempt"))?;
    tx.commit().await?;

    if created {
        record_attempt_event(AttemptEvent::Started);
        tracing::info!(
            attempt_id = %attempt.id,
            exam_id,
            user_id,
            full_mark = attempt.full_mark,
            "Exam attempt started"
        );
        Ok(StartOutcome::Created(attempt))
    } else {
        record_attempt_event(AttemptEvent::Resumed);
        Ok(StartOutcome::Resumed(attempt))
    }
}

/// Grades and stores one answer row per exam question, then refreshes the attempt score.
pub(crate) async fn save_answers(
    state: &AppState,
    attempt_id: &str,
    user_id: &str,
    selections: &HashMap<String, Option<String>>,
) -> Result<SaveOutcome, AttemptError> {
    let mut tx = state.db().begin().await?;

    let attempt = crate::repositories::attempts::lock_for_user(&mut *tx, attempt_id, user_id)
        .await?
        .ok_or(AttemptError::NotFound("Attempt not found"))?;
    if attempt.status.is_submitted() {
        return Ok(SaveOutcome::AlreadySubmitted);
    }

    let questions =
        crate::repositories::questions::list_by_exam(&mut *tx, &attempt.exam_id).await?;
    let choices = crate::repositories::choices::list_by_exam(&mut *tx, &attempt.exam_id).await?;
    let graded = scoring::grade_answers(&questions, &choices, selections)?;

    let now = primitive_now_utc();
    for answer in &graded {
        let row_id = Uuid::new_v4().to_string();
        crate::repositories::attempt_answers::upsert(
            &mut *tx,
            UpsertAnswer {
                id: &row_id,
                attempt_id: &attempt.id,
                question_id: &answer.question_id,
                selected_choice_id: answer.selected_choice_id.as_deref(),
                is_correct: answer.is_correct,
                earned_mark: answer.earned_mark,
                now,
            },
        )
        .await?;
    }

    let updated = crate::repositories::attempts::recompute_user_mark(&mut *tx, &attempt.id, now)
        .await?
        .ok_or(AttemptError::Conflict("Attempt is no longer in progress"))?;
    tx.commit().await?;

    if i64::from(updated.user_mark) != scoring::total_earned(&graded) {
        tracing::warn!(
            attempt_id = %updated.id,
            user_mark = updated.user_mark,
            graded = scoring::total_earned(&graded),
            "Stored attempt score differs from graded answers"
        );
    }
    if scoring::full_mark(&questions) != i64::from(updated.full_mark) {
        tracing::debug!(
            attempt_id = %updated.id,
            full_mark = updated.full_mark,
            current = scoring::full_mark(&questions),
            "Exam marks changed after the attempt started"
        );
    }

    record_attempt_event(AttemptEvent::AnswersSaved);
    tracing::info!(
        attempt_id = %updated.id,
        user_id,
        answers = graded.len(),
        user_mark = updated.user_mark,
        "Exam answers saved"
    );

    Ok(SaveOutcome::Saved(updated))
}

/// Finalizes the score and freezes the attempt.
pub(crate) async fn submit(
    state: &AppState,
    attempt_id: &str,
    user_id: &str,
) -> Result<SubmitOutcome, AttemptError> {
    let mut tx = state.db().begin().await?;

    let attempt = crate::repositories::attempts::lock_for_user(&mut *tx, attempt_id, user_id)
        .await?
        .ok_or(AttemptError::NotFound("Attempt not found"))?;
    if attempt.status.is_submitted() {
        return Ok(SubmitOutcome::AlreadySubmitted);
    }

    let submitted =
        crate::repositories::attempts::submit(&mut *tx, &attempt.id, primitive_now_utc())
            .await?
            .ok_or(AttemptError::Conflict("Attempt is no longer in progress"))?;
    tx.commit().await?;

    record_attempt_event(AttemptEvent::Submitted);
    tracing::info!(
        attempt_id = %submitted.id,
        exam_id = %submitted.exam_id,
        user_id,
        user_mark = submitted.user_mark,
        full_mark = submitted.full_mark,
        "Exam attempt submitted"
    );

    Ok(SubmitOutcome::Submitted(submitted))
}

pub(crate) async fn load_take(
    state: &AppState,
    attempt_id: &str,
    user_id: &str,
) -> Result<TakeOutcome, AttemptError> {
    let attempt = crate::repositories::attempts::find_for_user(state.db(), attempt_id, user_id)
        .await?
        .ok_or(AttemptError::NotFound("Attempt not found"))?;
    if attempt.status.is_submitted() {
        return Ok(TakeOutcome::Submitted);
    }

    let exam = crate::repositories::exams::find_by_id(state.db(), &attempt.exam_id)
        .await?
        .ok_or(AttemptError::NotFound("Exam not found"))?;
    let questions =
        crate::repositories::questions::list_by_exam(state.db(), &attempt.exam_id).await?;
    let choices = crate::repositories::choices::list_by_exam(state.db(), &attempt.exam_id).await?;
    let answers =
        crate::repositories::attempt_answers::list_by_attempt(state.db(), &attempt.id).await?;

    let selected: HashMap<&str, Option<&str>> = answers
        .iter()
        .map(|answer| (answer.question_id.as_str(), answer.selected_choice_id.as_deref()))
        .collect();

    let questions = questions
        .into_iter()
        .map(|question| {
            let options = choices
                .iter()
                .filter(|choice| choice.question_id == question.id)
                .map(choice_option)
                .collect();
            let selected_choice_id =
                selected.get(question.id.as_str()).copied().flatten().map(str::to_string);
            TakeQuestion {
                id: question.id,
                text: question.text,
                mark: question.mark,
                position: question.position,
                choices: options,
                selected_choice_id,
            }
        })
        .collect();

    Ok(TakeOutcome::Take(AttemptTakeResponse {
        id: attempt.id,
        exam_id: attempt.exam_id,
        exam_title: exam.title,
        status: attempt.status,
        started_at: format_primitive(attempt.started_at),
        full_mark: attempt.full_mark,
        questions,
    }))
}

pub(crate) async fn load_result(
    state: &AppState,
    attempt_id: &str,
    user_id: &str,
) -> Result<ResultOutcome, AttemptError> {
    let attempt = crate::repositories::attempts::find_for_user(state.db(), attempt_id, user_id)
        .await?
        .ok_or(AttemptError::NotFound("Attempt not found"))?;
    if !attempt.status.is_submitted() {
        return Ok(ResultOutcome::InProgress);
    }

    let exam = crate::repositories::exams::find_by_id(state.db(), &attempt.exam_id)
        .await?
        .ok_or(AttemptError::NotFound("Exam not found"))?;
    let questions =
        crate::repositories::questions::list_by_exam(state.db(), &attempt.exam_id).await?;
    let choices = crate::repositories::choices::list_by_exam(state.db(), &attempt.exam_id).await?;
    let answers =
        crate::repositories::attempt_answers::list_by_attempt(state.db(), &attempt.id).await?;

    let questions = questions
        .into_iter()
        .map(|question| {
            let answer = answers.iter().find(|answer| answer.question_id == question.id);
            let selected_choice = answer
                .and_then(|answer| answer.selected_choice_id.as_deref())
                .and_then(|choice_id| choices.iter().find(|choice| choice.id == choice_id))
                .map(choice_option);
            let correct_choice = scoring::correct_choice(&question.id, &choices).map(choice_option);
            ResultQuestion {
                id: question.id,
                text: question.text,
                mark: question.mark,
                selected_choice,
                is_correct: answer.map(|answer| answer.is_correct).unwrap_or(false),
                earned_mark: answer.map(|answer| answer.earned_mark).unwrap_or(0),
                correct_choice,
            }
        })
        .collect();

    Ok(ResultOutcome::Result(AttemptResultResponse {
        id: attempt.id,
        exam_id: attempt.exam_id,
        exam_title: exam.title,
        status: attempt.status,
        started_at: format_primitive(attempt.started_at),
        submitted_at: attempt.submitted_at.map(format_primitive),
        full_mark: attempt.full_mark,
        user_mark: attempt.user_mark,
        questions,
    }))
}

fn choice_option(choice: &AnswerChoice) -> ChoiceOption {
    ChoiceOption { id: choice.id.clone(), text: choice.text.clone() }
}
