//! Animation parameter plumbing.
//!
//! Controllers write named parameters through an [`AnimationSink`]. Names are resolved to
//! numeric handles once, at spawn, and cached in [`AnimParams`]; per-tick writes only pass
//! handles.

/// Stable numeric handle for an animation parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimHandle(pub i32);

impl AnimHandle {
    /// 32-bit FNV-1a of the parameter name, reinterpreted as `i32`.
    pub fn from_name(name: &str) -> Self {
        const OFFSET: u32 = 0x811c_9dc5;
        const PRIME: u32 = 0x0100_0193;
        let hash = name
            .bytes()
            .fold(OFFSET, |h, b| (h ^ b as u32).wrapping_mul(PRIME));
        Self(hash as i32)
    }
}

/// Receiver of animation parameter writes (an animator state machine, blend tree, ...).
pub trait AnimationSink {
    /// Map a parameter name to the handle later passed to the setters.
    fn resolve(&mut self, name: &str) -> AnimHandle {
        AnimHandle::from_name(name)
    }

    fn set_float(&mut self, param: AnimHandle, value: f32);
    fn set_bool(&mut self, param: AnimHandle, value: bool);
    fn set_trigger(&mut self, param: AnimHandle);
    fn set_layer_weight(&mut self, layer: i32, weight: f32);
}

/// Every parameter the controller writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimParam {
    Speed,
    LockOn,
    InputX,
    InputY,
    IsGround,
    Jump,
    FreeFall,
    Equip,
    Unarm,
    Landing,
    Equipping,
}

impl AnimParam {
    pub const COUNT: usize = 11;

    pub const ALL: [AnimParam; Self::COUNT] = [
        AnimParam::Speed,
        AnimParam::LockOn,
        AnimParam::InputX,
        AnimParam::InputY,
        AnimParam::IsGround,
        AnimParam::Jump,
        AnimParam::FreeFall,
        AnimParam::Equip,
        AnimParam::Unarm,
        AnimParam::Landing,
        AnimParam::Equipping,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnimParam::Speed => "Speed",
            AnimParam::LockOn => "LockOn",
            AnimParam::InputX => "InputX",
            AnimParam::InputY => "InputY",
            AnimParam::IsGround => "IsGround",
            AnimParam::Jump => "Jump",
            AnimParam::FreeFall => "FreeFall",
            AnimParam::Equip => "Equip",
            AnimParam::Unarm => "Unarm",
            AnimParam::Landing => "Landing",
            AnimParam::Equipping => "Equipping",
        }
    }
}

/// Name-to-handle cache, filled once per character.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimParams {
    handles: [AnimHandle; AnimParam::COUNT],
}

impl AnimParams {
    pub fn resolve(sink: &mut dyn AnimationSink) -> Self {
        Self {
            handles: AnimParam::ALL.map(|p| sink.resolve(p.name())),
        }
    }

    pub fn handle(&self, param: AnimParam) -> AnimHandle {
        self.handles[param as usize]
    }
}

/// Sink paired with its resolved handles for the duration of a tick.
pub struct Animator<'a> {
    pub sink: &'a mut dyn AnimationSink,
    pub params: &'a AnimParams,
}

impl<'a> Animator<'a> {
    pub fn new(sink: &'a mut dyn AnimationSink, params: &'a AnimParams) -> Self {
        Self { sink, params }
    }

    pub fn float(&mut self, param: AnimParam, value: f32) {
        self.sink.set_float(self.params.handle(param), value);
    }

    pub fn flag(&mut self, param: AnimParam, value: bool) {
        self.sink.set_bool(self.params.handle(param), value);
    }

    pub fn trigger(&mut self, param: AnimParam) {
        self.sink.set_trigger(self.params.handle(param));
    }

    pub fn layer_weight(&mut self, layer: i32, weight: f32) {
        self.sink.set_layer_weight(layer, weight);
    }
}
