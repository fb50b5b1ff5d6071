//! In-process request/response channel to an evaluator on another thread.
//!
//! Each search owns one `ChannelEvaluator`; the matching `EvaluatorEndpoint`
//! answers its requests one at a time, so replies pair with requests by
//! order alone. A pending request cannot be cancelled.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::core::SearchError;

use super::traits::{Evaluation, EvaluationRequest, Evaluator};

/// Create a connected evaluator/endpoint pair.
#[must_use]
pub fn evaluator_channel() -> (ChannelEvaluator, EvaluatorEndpoint) {
    let (request_tx, request_rx) = channel();
    let (response_tx, response_rx) = channel();
    (
        ChannelEvaluator {
            requests: request_tx,
            responses: response_rx,
        },
        EvaluatorEndpoint {
            requests: request_rx,
            responses: response_tx,
        },
    )
}

/// Search side: sends a request and blocks for the reply.
#[derive(Debug)]
pub struct ChannelEvaluator {
    requests: Sender<EvaluationRequest>,
    responses: Receiver<Evaluation>,
}

impl Evaluator for ChannelEvaluator {
    fn evaluate(&mut self, request: EvaluationRequest) -> Result<Evaluation, SearchError> {
        self.requests
            .send(request)
            .map_err(|_| SearchError::EvaluatorDisconnected)?;
        self.responses
            .recv()
            .map_err(|_| SearchError::EvaluatorDisconnected)
    }
}

/// Service side: receives requests and sends replies.
#[derive(Debug)]
pub struct EvaluatorEndpoint {
    requests: Receiver<EvaluationRequest>,
    responses: Sender<Evaluation>,
}

impl EvaluatorEndpoint {
    /// Next request, or `None` once the search side is gone.
    pub fn recv(&self) -> Option<EvaluationRequest> {
        self.requests.recv().ok()
    }

    /// Send a reply. Returns false if the search side is gone.
    pub fn reply(&self, evaluation: Evaluation) -> bool {
        self.responses.send(evaluation).is_ok()
    }

    /// Answer requests with `evaluator` until either side hangs up.
    ///
    /// Returns the number of requests answered.
    pub fn serve<E: Evaluator>(self, mut evaluator: E) -> Result<usize, SearchError> {
        let mut answered = 0;
        while let Some(request) = self.recv() {
            let evaluation = evaluator.evaluate(request)?;
            if !self.reply(evaluation) {
                break;
            }
            answered += 1;
        }
        log::trace!("evaluator endpoint closed after {answered} requests");
        Ok(answered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::game::GameMove;
    use crate::nn::{EncodedState, UniformEvaluator};
    use std::thread;

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            board: EncodedState::zeros(vec![1]),
            aux: EncodedState::zeros(vec![1]),
            legal_moves: vec![GameMove::Bool(true), GameMove::Bool(false)],
            seat: PlayerId::new(1),
        }
    }

    #[test]
    fn test_round_trip_through_thread() {
        let (mut evaluator, endpoint) = evaluator_channel();
        let server = thread::spawn(move || endpoint.serve(UniformEvaluator));

        for _ in 0..3 {
            let req = request();
            let eval = evaluator.evaluate(req.clone()).unwrap();
            assert!(eval.validate(&req.legal_moves).is_ok());
        }
        drop(evaluator);
        assert_eq!(server.join().unwrap(), Ok(3));
    }

    #[test]
    fn test_closed_endpoint_disconnects() {
        let (mut evaluator, endpoint) = evaluator_channel();
        drop(endpoint);
        assert_eq!(
            evaluator.evaluate(request()),
            Err(SearchError::EvaluatorDisconnected)
        );
    }
}
