//! Aggregates module
pub mod product;
pub mod address;
pub mod favourite;
pub mod cart;
pub mod order;
pub mod user;

pub use product::{NewProduct, PreviewImage, Product, ProductImages};
pub use address::{Address, AddressPatch, AddressType, NewAddress};
pub use favourite::{Favourite, FavouriteItem};
pub use cart::{CartEntry, CartItem, Membership};
pub use order::{DeliveryAddress, Order, OrderError, OrderedItem};
pub use user::{User, UserCredentials, UserPatch};
