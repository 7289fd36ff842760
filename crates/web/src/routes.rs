//! Route filters and request handlers.

use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::{Uri, header};
use warp::{Filter, Rejection, Reply};

use services::{FlowError, QuizFlowService, QuizStep};

use crate::cookie::{CookieCodec, SESSION_COOKIE};
use crate::rejections::{InternalServerError, handle_rejection};
use crate::views;

/// Shared handler state: the flow service plus the cookie codec.
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<QuizFlowService>,
    pub cookies: CookieCodec,
}

#[derive(Deserialize)]
struct StartForm {
    #[serde(default)]
    username: String,
}

#[derive(Deserialize)]
struct AnswerForm {
    #[serde(default)]
    option: Option<String>,
}

fn with_state(
    state: AppState,
) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// The full filter tree, rejection recovery included.
pub fn routes(
    state: AppState,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    // Path filters come before method filters so an unknown path rejects as
    // not-found rather than method-not-allowed when the branches combine.
    let index = warp::path::end()
        .and(warp::get())
        .and_then(index_page);

    let start = warp::path::end()
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::body::form::<StartForm>())
        .and_then(start_quiz);

    let quiz = warp::path!("quiz")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and_then(quiz_page);

    let submit = warp::path!("quiz")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(warp::body::form::<AnswerForm>())
        .and_then(submit_answer);

    let result = warp::path!("result")
        .and(warp::get())
        .and(with_state(state))
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and_then(result_page);

    index
        .or(start)
        .or(quiz)
        .or(submit)
        .or(result)
        .recover(handle_rejection)
}

async fn index_page() -> Result<warp::reply::Response, Rejection> {
    Ok(html_reply(views::index_page()))
}

async fn start_quiz(
    state: AppState,
    form: StartForm,
) -> Result<warp::reply::Response, Rejection> {
    let token = state.flow.start(&form.username).await.map_err(|e| {
        tracing::error!("could not start quiz session: {e}");
        warp::reject::custom(InternalServerError)
    })?;

    let reply = warp::reply::with_header(
        warp::redirect::found(Uri::from_static("/quiz")),
        header::SET_COOKIE,
        state.cookies.set_cookie(token),
    );
    Ok(reply.into_response())
}

async fn quiz_page(
    state: AppState,
    cookie: Option<String>,
) -> Result<warp::reply::Response, Rejection> {
    match resolve_step(&state, cookie.as_deref()).await? {
        QuizStep::Question {
            number,
            total,
            question,
        } => Ok(html_reply(views::question_page(number, total, &question))),
        QuizStep::Complete => Ok(found("/result")),
    }
}

async fn submit_answer(
    state: AppState,
    cookie: Option<String>,
    form: AnswerForm,
) -> Result<warp::reply::Response, Rejection> {
    let Some(token) = cookie.as_deref().and_then(|c| state.cookies.verify(c)) else {
        return Ok(found("/result"));
    };

    match state.flow.record_answer(token, form.option).await {
        Ok(result) if result.recorded => Ok(found("/quiz")),
        Ok(_) | Err(FlowError::SessionNotFound) => Ok(found("/result")),
        Err(e) => {
            tracing::error!("could not record answer: {e}");
            Err(warp::reject::custom(InternalServerError))
        }
    }
}

async fn result_page(
    state: AppState,
    cookie: Option<String>,
) -> Result<warp::reply::Response, Rejection> {
    let token = cookie.as_deref().and_then(|c| state.cookies.verify(c));
    let outcome = state.flow.finish(token).await.map_err(|e| {
        tracing::error!("could not finish quiz: {e}");
        warp::reject::custom(InternalServerError)
    })?;

    Ok(html_reply(views::result_page(
        &outcome.username,
        &outcome.score,
    )))
}

/// A verified session's current step; a missing or unverifiable session
/// behaves like a completed one, which routes the browser to the result page.
async fn resolve_step(state: &AppState, cookie: Option<&str>) -> Result<QuizStep, Rejection> {
    let Some(token) = cookie.and_then(|c| state.cookies.verify(c)) else {
        return Ok(QuizStep::Complete);
    };

    match state.flow.current_step(token).await {
        Ok(step) => Ok(step),
        Err(FlowError::SessionNotFound) => Ok(QuizStep::Complete),
        Err(e) => {
            tracing::error!("could not read session state: {e}");
            Err(warp::reject::custom(InternalServerError))
        }
    }
}

fn html_reply(page: maud::Markup) -> warp::reply::Response {
    warp::reply::html(page.into_string()).into_response()
}

fn found(location: &'static str) -> warp::reply::Response {
    warp::redirect::found(Uri::from_static(location)).into_response()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::{Question, Score, TraitName};
    use quiz_core::time::fixed_clock;
    use std::sync::Mutex;
    use storage::repository::{
        InMemorySessionStore, QuestionRepository, ResultLogRepository, StorageError,
    };

    struct StaticQuestions(Vec<Question>);

    #[async_trait]
    impl QuestionRepository for StaticQuestions {
        async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct MemoryResultLog(Mutex<Vec<String>>);

    #[async_trait]
    impl ResultLogRepository for MemoryResultLog {
        async fn append(&self, username: &str, score: &Score) -> Result<(), StorageError> {
            self.0.lock().unwrap().push(format!("{username}, {score}"));
            Ok(())
        }
    }

    fn three_question_state() -> AppState {
        let questions = vec![
            Question::new("I am the life of the party.", false, TraitName::Extraversion),
            Question::new("I sympathize with others.", false, TraitName::Agreeableness),
            Question::new("I have a vivid imagination.", false, TraitName::Openness),
        ];
        state_with(questions)
    }

    fn state_with(questions: Vec<Question>) -> AppState {
        let flow = QuizFlowService::new(
            fixed_clock(),
            Arc::new(StaticQuestions(questions)),
            Arc::new(InMemorySessionStore::new(fixed_clock())),
            Arc::new(MemoryResultLog::default()),
        );
        AppState {
            flow: Arc::new(flow),
            cookies: CookieCodec::from_secret("test-secret"),
        }
    }

    /// The `quiz_session=...` pair from a start response, ready for a
    /// `Cookie` request header.
    fn session_cookie<T>(resp: &warp::http::Response<T>) -> String {
        resp.headers()
            .get("set-cookie")
            .expect("start should set the session cookie")
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_owned()
    }

    /// POST the entry form and hand back the session cookie. A macro because
    /// the composed filter type cannot be named in a helper signature.
    macro_rules! start_session {
        ($api:expr, $username:expr) => {{
            let resp = warp::test::request()
                .method("POST")
                .path("/")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(format!("username={}", $username))
                .reply($api)
                .await;
            assert_eq!(resp.status(), 302);
            assert_eq!(resp.headers()["location"], "/quiz");
            session_cookie(&resp)
        }};
    }

    #[tokio::test]
    async fn entry_form_renders() {
        let api = routes(three_question_state());
        let resp = warp::test::request().path("/").reply(&api).await;

        assert_eq!(resp.status(), 200);
        let body = String::from_utf8_lossy(resp.body());
        assert!(body.contains("Personality Quiz"));
        assert!(body.contains("name=\"username\""));
    }

    #[tokio::test]
    async fn quiz_walks_through_questions_and_scores_them() {
        let api = routes(three_question_state());
        let cookie = start_session!(&api, "ada");

        for expected in ["Question 1 of 3", "Question 2 of 3", "Question 3 of 3"] {
            let resp = warp::test::request()
                .path("/quiz")
                .header("cookie", &cookie)
                .reply(&api)
                .await;
            assert_eq!(resp.status(), 200);
            assert!(String::from_utf8_lossy(resp.body()).contains(expected));

            let resp = warp::test::request()
                .method("POST")
                .path("/quiz")
                .header("cookie", &cookie)
                .header("content-type", "application/x-www-form-urlencoded")
                .body("option=5")
                .reply(&api)
                .await;
            assert_eq!(resp.status(), 302);
            assert_eq!(resp.headers()["location"], "/quiz");
        }

        // Complete: the quiz endpoint now always redirects to the result.
        let resp = warp::test::request()
            .path("/quiz")
            .header("cookie", &cookie)
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["location"], "/result");

        let resp = warp::test::request()
            .path("/result")
            .header("cookie", &cookie)
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 200);
        let body = String::from_utf8_lossy(resp.body()).into_owned();
        assert!(body.contains("Results for ada"));
        assert!(body.contains("Extraversion"));
        assert!(body.contains("<td>5</td>"));
    }

    #[tokio::test]
    async fn quiz_without_a_session_redirects_to_result() {
        let api = routes(three_question_state());
        let resp = warp::test::request().path("/quiz").reply(&api).await;

        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["location"], "/result");
    }

    #[tokio::test]
    async fn tampered_cookie_is_treated_as_no_session() {
        let api = routes(three_question_state());
        let cookie = start_session!(&api, "ada");

        let mut forged = cookie.clone();
        // flip the final mac character
        let last = if forged.ends_with('0') { '1' } else { '0' };
        forged.pop();
        forged.push(last);

        let resp = warp::test::request()
            .path("/quiz")
            .header("cookie", &forged)
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["location"], "/result");
    }

    #[tokio::test]
    async fn submitting_after_completion_redirects_to_result_without_recording() {
        let api = routes(state_with(vec![Question::new(
            "Q0",
            false,
            TraitName::Openness,
        )]));
        let cookie = start_session!(&api, "ada");

        let resp = warp::test::request()
            .method("POST")
            .path("/quiz")
            .header("cookie", &cookie)
            .header("content-type", "application/x-www-form-urlencoded")
            .body("option=4")
            .reply(&api)
            .await;
        assert_eq!(resp.headers()["location"], "/quiz");

        let resp = warp::test::request()
            .method("POST")
            .path("/quiz")
            .header("cookie", &cookie)
            .header("content-type", "application/x-www-form-urlencoded")
            .body("option=1")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["location"], "/result");

        let resp = warp::test::request()
            .path("/result")
            .header("cookie", &cookie)
            .reply(&api)
            .await;
        // the late submit did not overwrite the recorded answer
        assert!(String::from_utf8_lossy(resp.body()).contains("<td>4</td>"));
    }

    #[tokio::test]
    async fn step_without_an_option_still_advances() {
        let api = routes(state_with(vec![
            Question::new("Q0", false, TraitName::Openness),
            Question::new("Q1", false, TraitName::Openness),
        ]));
        let cookie = start_session!(&api, "ada");

        let resp = warp::test::request()
            .method("POST")
            .path("/quiz")
            .header("cookie", &cookie)
            .header("content-type", "application/x-www-form-urlencoded")
            .body("")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["location"], "/quiz");

        let resp = warp::test::request()
            .path("/quiz")
            .header("cookie", &cookie)
            .reply(&api)
            .await;
        assert!(String::from_utf8_lossy(resp.body()).contains("Question 2 of 2"));
    }

    #[tokio::test]
    async fn result_without_a_session_renders_anonymous_zeros() {
        let api = routes(three_question_state());
        let resp = warp::test::request().path("/result").reply(&api).await;

        assert_eq!(resp.status(), 200);
        let body = String::from_utf8_lossy(resp.body()).into_owned();
        assert!(body.contains("Results for Anonymous"));
        assert!(body.contains("<td>0</td>"));
    }

    #[tokio::test]
    async fn start_with_missing_username_field_uses_empty_string() {
        let api = routes(three_question_state());
        let resp = warp::test::request()
            .method("POST")
            .path("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["location"], "/quiz");
    }

    #[tokio::test]
    async fn unknown_path_is_a_not_found_page() {
        let api = routes(three_question_state());
        let resp = warp::test::request().path("/nope").reply(&api).await;
        assert_eq!(resp.status(), 404);
    }
}
