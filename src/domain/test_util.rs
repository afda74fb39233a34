use anyhow::anyhow;

/// Whether an in-memory driven port should behave as if its backing service is reachable
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Produces an error when the fake is configured as unreachable
    pub fn blow_up_if_disconnected(&self) -> Result<(), anyhow::Error> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(anyhow!("could not connect to service!")),
        }
    }
}

/// Records the arguments of every call to a faked function and hands back a preconfigured
/// result. Mocking libraries struggle with `async fn` in traits, so mock ports keep one of
/// these per function and lock themselves to mutate it.
///
/// * [Args] is whatever should be captured from a single call
/// * [Ret] is the faked function's return type
///
/// # Example
///
/// ```ignore
/// struct MockItemService {
///     delete_item_result: FakeImplementation<i32, Result<(), ItemError>>,
/// }
///
/// impl ItemPort for Mutex<MockItemService> {
///     async fn delete_item(&self, item_id: i32, /* ... */) -> Result<(), ItemError> {
///         let mut locked_self = self.lock().unwrap();
///         locked_self.delete_item_result.save_arguments(item_id);
///         locked_self.delete_item_result.return_value_result()
///     }
/// }
/// ```
pub struct FakeImplementation<Args, Ret> {
    saved_arguments: Vec<Args>,
    return_value: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            saved_arguments: Vec::new(),
            return_value: None,
        }
    }

    /// Captures the arguments of one invocation
    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Arguments from every invocation so far, oldest first
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }
}

impl<Args, Success, Fail> FakeImplementation<Args, Result<Success, Fail>>
where
    Success: Clone,
    Fail: Clone,
{
    pub fn set_returned_result(&mut self, return_value: Result<Success, Fail>) {
        self.return_value = Some(return_value)
    }

    pub fn return_value_result(&self) -> Result<Success, Fail> {
        match self.return_value {
            Some(ref result) => result.clone(),
            None => panic!("Tried to return from a function where the return value wasn't set!"),
        }
    }
}

/// [anyhow::Error] can't be cloned, so results carrying one are rebuilt from the error message
impl<Args, Success> FakeImplementation<Args, anyhow::Result<Success>>
where
    Success: Clone,
{
    pub fn set_returned_anyhow(&mut self, return_value: anyhow::Result<Success>) {
        self.return_value = Some(return_value)
    }

    pub fn return_value_anyhow(&self) -> anyhow::Result<Success> {
        match self.return_value {
            None => panic!("Tried to return from a function where the value wasn't set!"),
            Some(Ok(ref ok_result)) => Ok(ok_result.clone()),
            Some(Err(ref err)) => Err(anyhow!(format!("{}", err))),
        }
    }
}
