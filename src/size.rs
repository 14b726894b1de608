//! Input size policy.
use crate::registry::ModelRegistry;

/// Side used for the warm-up pass of models without a fixed input size.
pub const DYNAMIC_WARMUP_SIDE: i64 = 224;

/// How images are sized before being fed to a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSize {
    /// Always resize with padding to a `side x side` square.
    Fixed(i64),
    /// Resize with padding to `max x max` only when a side exceeds `max`.
    Dynamic { max: i64 },
}

impl InputSize {
    /// Target square side for an image of the given height and width, `None`
    /// when the image is fed as is.
    pub fn target_side(&self, height: i64, width: i64) -> Option<i64> {
        match *self {
            InputSize::Fixed(side) => Some(side),
            InputSize::Dynamic { max } if height > max || width > max => Some(max),
            InputSize::Dynamic { .. } => None,
        }
    }

    pub fn warmup_side(&self) -> i64 {
        match *self {
            InputSize::Fixed(side) => side,
            InputSize::Dynamic { .. } => DYNAMIC_WARMUP_SIDE,
        }
    }
}

impl std::fmt::Display for InputSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSize::Fixed(side) => write!(f, "{side}x{side}"),
            InputSize::Dynamic { max } => write!(f, "at most {max}x{max}"),
        }
    }
}

pub fn resolve_input_size(registry: &ModelRegistry, name: &str, max_dynamic_size: i64) -> InputSize {
    match registry.fixed_size(name) {
        Some(side) => InputSize::Fixed(side),
        None => InputSize::Dynamic { max: max_dynamic_size },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_for_every_sized_entry() {
        let registry = ModelRegistry::builtin();
        for name in registry.names() {
            let expected = match registry.fixed_size(name) {
                Some(side) => InputSize::Fixed(side),
                None => InputSize::Dynamic { max: 512 },
            };
            assert_eq!(resolve_input_size(&registry, name, 512), expected, "{name}");
        }
        assert_eq!(resolve_input_size(&registry, "resnet_v1_50", 512), InputSize::Fixed(224));
        assert_eq!(resolve_input_size(&registry, "efficientnet_b6", 512), InputSize::Fixed(528));
    }

    #[test]
    fn dynamic_for_unknown_names() {
        let registry = ModelRegistry::builtin();
        assert_eq!(resolve_input_size(&registry, "my-custom-net", 512), InputSize::Dynamic { max: 512 });
        assert_eq!(resolve_input_size(&registry, "bit_s-r50x1", 640), InputSize::Dynamic { max: 640 });
    }

    #[test]
    fn target_side() {
        assert_eq!(InputSize::Fixed(224).target_side(10, 1000), Some(224));
        let dynamic = InputSize::Dynamic { max: 512 };
        assert_eq!(dynamic.target_side(512, 512), None);
        assert_eq!(dynamic.target_side(513, 20), Some(512));
        assert_eq!(dynamic.target_side(20, 800), Some(512));
        assert_eq!(dynamic.warmup_side(), 224);
        assert_eq!(InputSize::Fixed(299).warmup_side(), 299);
    }
}
