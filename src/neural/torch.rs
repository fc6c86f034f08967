//! Convolutional policy/value network backed by libtorch.
//!
//! Input is the one-hot encoding reshaped to `[1, 3, 9, 9]`; the policy head
//! produces `NUM_ACTIONS` logits turned into a softmax prior, the value head a
//! `tanh` scalar from the point of view of the side to move.

use crate::game::action::NUM_ACTIONS;
use crate::game::board::Board;
use crate::game::square::BOARD_SIZE;
use crate::neural::evaluator::{Evaluation, Evaluator, EvaluatorError};
use crate::neural::tensor_onehot::{encode_board, ONEHOT_CHANNELS};
use std::path::Path;
use tch::{nn, nn::Module, Device, Kind, Tensor};

const TRUNK_CHANNELS: &[i64] = &[64, 64, 64];
const HIDDEN: i64 = 256;

pub struct PolicyValueNet {
    trunk: Vec<nn::Conv2D>,
    policy_head: nn::Linear,
    value_fc: nn::Linear,
    value_head: nn::Linear,
}

impl PolicyValueNet {
    pub fn new(vs: &nn::VarStore) -> Self {
        let p = vs.root();

        let mut trunk = Vec::with_capacity(TRUNK_CHANNELS.len());
        let mut in_channels = ONEHOT_CHANNELS as i64;
        for (idx, &out_channels) in TRUNK_CHANNELS.iter().enumerate() {
            trunk.push(nn::conv2d(
                &p / format!("conv_{idx}"),
                in_channels,
                out_channels,
                3,
                nn::ConvConfig {
                    padding: 1,
                    ..Default::default()
                },
            ));
            in_channels = out_channels;
        }

        let flatten_size = in_channels * (BOARD_SIZE * BOARD_SIZE) as i64;
        log::debug!("PolicyValueNet flatten_size: {}", flatten_size);

        Self {
            trunk,
            policy_head: nn::linear(&p / "policy_head", flatten_size, NUM_ACTIONS as i64, Default::default()),
            value_fc: nn::linear(&p / "value_fc", flatten_size, HIDDEN, Default::default()),
            value_head: nn::linear(&p / "value_head", HIDDEN, 1, Default::default()),
        }
    }

    /// Returns `(policy_logits, value)` for a `[N, 3, 9, 9]` batch.
    pub fn forward(&self, x: &Tensor) -> (Tensor, Tensor) {
        let mut h = x.shallow_clone();
        for conv in &self.trunk {
            h = h.apply(conv).relu();
        }
        let h = h.flatten(1, -1);
        let policy = self.policy_head.forward(&h);
        let value = h.apply(&self.value_fc).relu().apply(&self.value_head).tanh();
        (policy, value)
    }
}

/// Evaluator running a [`PolicyValueNet`] loaded from a `VarStore` file.
pub struct TorchEvaluator {
    vs: nn::VarStore,
    net: PolicyValueNet,
}

impl TorchEvaluator {
    /// Randomly initialised network, mostly useful for smoke tests.
    pub fn new(device: Device) -> Self {
        let vs = nn::VarStore::new(device);
        let net = PolicyValueNet::new(&vs);
        Self { vs, net }
    }

    pub fn load(path: impl AsRef<Path>, device: Device) -> Result<Self, EvaluatorError> {
        let mut evaluator = Self::new(device);
        evaluator
            .vs
            .load(path.as_ref())
            .map_err(|e| EvaluatorError::Model(e.to_string()))?;
        log::info!("Loaded model weights from {}", path.as_ref().display());
        Ok(evaluator)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EvaluatorError> {
        self.vs
            .save(path.as_ref())
            .map_err(|e| EvaluatorError::Model(e.to_string()))
    }
}

impl Evaluator for TorchEvaluator {
    fn evaluate(&mut self, board: &Board) -> Result<Evaluation, EvaluatorError> {
        let size = BOARD_SIZE as i64;
        let input = Tensor::from_slice(encode_board(board).as_slice())
            .view([1, ONEHOT_CHANNELS as i64, size, size])
            .to_device(self.vs.device());

        let (logits, value) = tch::no_grad(|| self.net.forward(&input));

        let policy = logits
            .softmax(-1, Kind::Float)
            .view([-1])
            .to_device(Device::Cpu);
        let policy = Vec::<f32>::try_from(&policy).map_err(|e| EvaluatorError::Model(e.to_string()))?;
        let value = value.double_value(&[0, 0]) as f32;

        let evaluation = Evaluation { policy, value };
        evaluation.validate()?;
        Ok(evaluation)
    }
}
