pub mod file;

use crate::app::Result;
use crate::domain::SeenSet;

pub use file::FileSeenStore;

pub trait SeenStore {
    /// Read the persisted seen-set. A store with nothing persisted yet
    /// yields an empty set.
    fn load(&self) -> Result<SeenSet>;

    /// Replace the persisted seen-set.
    fn save(&self, seen: &SeenSet) -> Result<()>;
}
