use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use uuid::Uuid;

use sea_orm::{Condition, ConnectionTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Counterparty, Customer, CustomerListFilter, CustomerPatch, EngineError, NewCustomer, NewSupplier,
    ResultEngine, Supplier, SupplierListFilter, SupplierPatch, customers, suppliers,
    util::{apply_optional_text_patch, normalize_optional_text, normalize_required_name},
};

use super::Engine;

impl Engine {
    pub async fn create_customer(&self, cmd: NewCustomer) -> ResultEngine<Customer> {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            name: normalize_required_name(&cmd.name, "customer")?,
            phone_number: normalize_optional_text(cmd.phone_number.as_deref()),
            address: normalize_optional_text(cmd.address.as_deref()),
            gstin: normalize_optional_text(cmd.gstin.as_deref()),
            customer_type: cmd.customer_type,
            notes: normalize_optional_text(cmd.notes.as_deref()),
            outstanding_balance: cmd.outstanding_balance,
            created_at: now,
            updated_at: now,
        };
        let model: customers::ActiveModel = (&customer).into();
        model.insert(&self.database).await?;
        Ok(customer)
    }

    pub async fn customer(&self, customer_id: Uuid) -> ResultEngine<Customer> {
        require_customer(&self.database, customer_id).await
    }

    /// Lists customers ordered by name.
    pub async fn list_customers(&self, filter: &CustomerListFilter) -> ResultEngine<Vec<Customer>> {
        let mut query = customers::Entity::find();
        if let Some(search) = normalize_optional_text(filter.search.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(customers::Column::Name.contains(&search))
                    .add(customers::Column::PhoneNumber.contains(&search)),
            );
        }
        if let Some(customer_type) = filter.customer_type {
            query = query.filter(customers::Column::CustomerType.eq(customer_type.as_str()));
        }
        query
            .order_by_asc(customers::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Customer::try_from)
            .collect()
    }

    /// Patches contact fields. The outstanding balance only moves through
    /// payments.
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        patch: CustomerPatch,
    ) -> ResultEngine<Customer> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "customer"))
            .transpose()?;

        self.with_tx(|_engine, db_tx| {
            Box::pin(async move {
                let mut customer = require_customer(db_tx, customer_id).await?;
                if let Some(name) = name {
                    customer.name = name;
                }
                customer.phone_number =
                    apply_optional_text_patch(customer.phone_number, patch.phone_number.as_deref());
                customer.address =
                    apply_optional_text_patch(customer.address, patch.address.as_deref());
                customer.gstin = apply_optional_text_patch(customer.gstin, patch.gstin.as_deref());
                customer.notes = apply_optional_text_patch(customer.notes, patch.notes.as_deref());
                if let Some(customer_type) = patch.customer_type {
                    customer.customer_type = customer_type;
                }
                customer.updated_at = Utc::now();

                let model: customers::ActiveModel = (&customer).into();
                model.update(db_tx).await?;
                Ok(customer)
            })
        })
        .await
    }

    /// Removes a customer. Invoices, payments and ledger entries keep their
    /// (now dangling) reference.
    pub async fn delete_customer(&self, customer_id: Uuid) -> ResultEngine<()> {
        let result = customers::Entity::delete_by_id(customer_id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("customer not exists".to_string()));
        }
        Ok(())
    }

    pub async fn create_supplier(&self, cmd: NewSupplier) -> ResultEngine<Supplier> {
        let now = Utc::now();
        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: normalize_required_name(&cmd.name, "supplier")?,
            contact_person: normalize_optional_text(cmd.contact_person.as_deref()),
            phone_number: normalize_optional_text(cmd.phone_number.as_deref()),
            address: normalize_optional_text(cmd.address.as_deref()),
            gstin: normalize_optional_text(cmd.gstin.as_deref()),
            bank_name: normalize_optional_text(cmd.bank_name.as_deref()),
            bank_account_number: normalize_optional_text(cmd.bank_account_number.as_deref()),
            bank_ifsc_code: normalize_optional_text(cmd.bank_ifsc_code.as_deref()),
            notes: normalize_optional_text(cmd.notes.as_deref()),
            outstanding_balance: cmd.outstanding_balance,
            created_at: now,
            updated_at: now,
        };
        let model: suppliers::ActiveModel = (&supplier).into();
        model.insert(&self.database).await?;
        Ok(supplier)
    }

    pub async fn supplier(&self, supplier_id: Uuid) -> ResultEngine<Supplier> {
        require_supplier(&self.database, supplier_id).await
    }

    /// Lists suppliers ordered by name.
    pub async fn list_suppliers(&self, filter: &SupplierListFilter) -> ResultEngine<Vec<Supplier>> {
        let mut query = suppliers::Entity::find();
        if let Some(search) = normalize_optional_text(filter.search.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(suppliers::Column::Name.contains(&search))
                    .add(suppliers::Column::ContactPerson.contains(&search))
                    .add(suppliers::Column::PhoneNumber.contains(&search)),
            );
        }
        query
            .order_by_asc(suppliers::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Supplier::try_from)
            .collect()
    }

    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        patch: SupplierPatch,
    ) -> ResultEngine<Supplier> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "supplier"))
            .transpose()?;

        self.with_tx(|_engine, db_tx| {
            Box::pin(async move {
                let mut supplier = require_supplier(db_tx, supplier_id).await?;
                if let Some(name) = name {
                    supplier.name = name;
                }
                supplier.contact_person = apply_optional_text_patch(
                    supplier.contact_person,
                    patch.contact_person.as_deref(),
                );
                supplier.phone_number =
                    apply_optional_text_patch(supplier.phone_number, patch.phone_number.as_deref());
                supplier.address =
                    apply_optional_text_patch(supplier.address, patch.address.as_deref());
                supplier.gstin = apply_optional_text_patch(supplier.gstin, patch.gstin.as_deref());
                supplier.bank_name =
                    apply_optional_text_patch(supplier.bank_name, patch.bank_name.as_deref());
                supplier.bank_account_number = apply_optional_text_patch(
                    supplier.bank_account_number,
                    patch.bank_account_number.as_deref(),
                );
                supplier.bank_ifsc_code = apply_optional_text_patch(
                    supplier.bank_ifsc_code,
                    patch.bank_ifsc_code.as_deref(),
                );
                supplier.notes = apply_optional_text_patch(supplier.notes, patch.notes.as_deref());
                supplier.updated_at = Utc::now();

                let model: suppliers::ActiveModel = (&supplier).into();
                model.update(db_tx).await?;
                Ok(supplier)
            })
        })
        .await
    }

    pub async fn delete_supplier(&self, supplier_id: Uuid) -> ResultEngine<()> {
        let result = suppliers::Entity::delete_by_id(supplier_id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("supplier not exists".to_string()));
        }
        Ok(())
    }
}

pub(crate) async fn require_customer<C: ConnectionTrait>(
    db: &C,
    customer_id: Uuid,
) -> ResultEngine<Customer> {
    let model = customers::Entity::find_by_id(customer_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))?;
    Customer::try_from(model)
}

pub(crate) async fn require_supplier<C: ConnectionTrait>(
    db: &C,
    supplier_id: Uuid,
) -> ResultEngine<Supplier> {
    let model = suppliers::Entity::find_by_id(supplier_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("supplier not exists".to_string()))?;
    Supplier::try_from(model)
}

/// Display names of customers and suppliers, resolved in one batch.
///
/// Missing rows are simply absent: references to them stay dangling.
#[derive(Debug, Default)]
pub(crate) struct PartyNames {
    customers: HashMap<Uuid, String>,
    suppliers: HashMap<Uuid, String>,
}

impl PartyNames {
    pub(crate) async fn load<C, I>(db: &C, parties: I) -> ResultEngine<Self>
    where
        C: ConnectionTrait,
        I: IntoIterator<Item = Counterparty>,
    {
        let mut customer_ids = BTreeSet::new();
        let mut supplier_ids = BTreeSet::new();
        for party in parties {
            match party {
                Counterparty::Customer(id) => customer_ids.insert(id.to_string()),
                Counterparty::Supplier(id) => supplier_ids.insert(id.to_string()),
            };
        }

        let mut names = Self::default();
        if !customer_ids.is_empty() {
            for model in customers::Entity::find()
                .filter(customers::Column::Id.is_in(customer_ids))
                .all(db)
                .await?
            {
                if let Ok(id) = Uuid::parse_str(&model.id) {
                    names.customers.insert(id, model.name);
                }
            }
        }
        if !supplier_ids.is_empty() {
            for model in suppliers::Entity::find()
                .filter(suppliers::Column::Id.is_in(supplier_ids))
                .all(db)
                .await?
            {
                if let Ok(id) = Uuid::parse_str(&model.id) {
                    names.suppliers.insert(id, model.name);
                }
            }
        }
        Ok(names)
    }

    pub(crate) fn name_of(&self, party: Counterparty) -> Option<String> {
        match party {
            Counterparty::Customer(id) => self.customers.get(&id).cloned(),
            Counterparty::Supplier(id) => self.suppliers.get(&id).cloned(),
        }
    }
}
