use crate::authentication::AccountRepo;
use crate::catalog::ProductsRepo;
use crate::likes::LikesRepo;

pub trait Repository: AccountRepo + ProductsRepo + LikesRepo + Clone {}

impl<T> Repository for T where T: Clone + AccountRepo + ProductsRepo + LikesRepo {}
