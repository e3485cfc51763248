use crate::query::{
    ast::{
        common::OrderDir,
        select::{FromClause, OrderByExpr, Select},
    },
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        // 1. SELECT clause
        r.sql.push_str("SELECT ");
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        // 2. FROM
        if let Some(from) = &self.from {
            r.sql.push(' ');
            from.render(r);
        }

        // 3. WHERE
        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }

        // 4. ORDER BY
        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                order.render(r);
            }
        }

        // 5. LIMIT
        if let Some(limit) = &self.limit {
            r.sql.push_str(" LIMIT ");
            limit.render(r);
        }

        // 6. OFFSET
        if let Some(offset) = &self.offset {
            r.sql.push_str(" OFFSET ");
            offset.render(r);
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("FROM ");
        r.render_table_ref(&self.table);
    }
}

impl Render for OrderByExpr {
    fn render(&self, r: &mut Renderer) {
        self.expr.render(r);
        if let Some(dir) = &self.direction {
            let dir_str = match dir {
                OrderDir::Asc => "ASC",
                OrderDir::Desc => "DESC",
            };
            r.sql.push(' ');
            r.sql.push_str(dir_str);
        }
    }
}

#[cfg(test)]
mod tests {
    use model::core::value::Value;

    use crate::query::{
        ast::{
            common::{OrderDir, TableRef},
            expr::{BinaryOperator, Expr},
            select::{FromClause, OrderByExpr, Select},
        },
        dialect::{MySql, Postgres},
        ident,
        renderer::render_sql,
        value,
    };

    fn projects() -> Option<FromClause> {
        Some(FromClause {
            table: TableRef::new("projects"),
        })
    }

    #[test]
    fn test_simple_select_postgres() {
        let ast = Select {
            columns: vec![Expr::Wildcard],
            from: projects(),
            where_clause: Some(Expr::binary(
                ident("id"),
                BinaryOperator::Eq,
                value(Value::Int(123)),
            )),
            ..Default::default()
        };

        let (sql, params) = render_sql(&ast, &Postgres);

        assert_eq!(sql, r#"SELECT * FROM "projects" WHERE ("id" = $1)"#);
        assert_eq!(params, vec![Value::Int(123)]);
    }

    #[test]
    fn test_simple_select_mysql() {
        let ast = Select {
            columns: vec![Expr::Wildcard],
            from: projects(),
            where_clause: Some(Expr::binary(
                ident("name"),
                BinaryOperator::NotEq,
                value(Value::String("abc".to_string())),
            )),
            ..Default::default()
        };

        let (sql, params) = render_sql(&ast, &MySql);

        assert_eq!(sql, "SELECT * FROM `projects` WHERE (`name` <> ?)");
        assert_eq!(params, vec![Value::String("abc".to_string())]);
    }

    #[test]
    fn test_paged_select_postgres() {
        let ast = Select {
            columns: vec![Expr::Wildcard],
            from: Some(FromClause {
                table: TableRef {
                    schema: Some("public".to_string()),
                    name: "projects".to_string(),
                },
            }),
            where_clause: Some(Expr::binary(
                ident("id"),
                BinaryOperator::Lt,
                value(Value::Int(10)),
            )),
            order_by: vec![OrderByExpr {
                expr: ident("id"),
                direction: Some(OrderDir::Desc),
            }],
            limit: Some(value(Value::Uint(3))),
            offset: Some(value(Value::Uint(6))),
        };

        let (sql, params) = render_sql(&ast, &Postgres);

        let expected_sql = r#"SELECT * FROM "public"."projects" WHERE ("id" < $1) ORDER BY "id" DESC LIMIT $2 OFFSET $3"#;
        assert_eq!(sql, expected_sql);
        assert_eq!(
            params,
            vec![Value::Int(10), Value::Uint(3), Value::Uint(6)]
        );
    }

    #[test]
    fn test_count_select() {
        let ast = Select {
            columns: vec![Expr::CountAll],
            from: projects(),
            ..Default::default()
        };

        let (sql, params) = render_sql(&ast, &MySql);

        assert_eq!(sql, "SELECT COUNT(*) FROM `projects`");
        assert!(params.is_empty());
    }
}
